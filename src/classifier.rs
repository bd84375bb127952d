// Line classification: 4-char tag, delimiter at index 4, payload from index 5

use crate::models::{RateCode, Record, Unrecognized};
use serde::Deserialize;

const TAG_LEN: usize = 4;
const PAYLOAD_START: usize = 5;

pub const MODE_TAG: &str = "MODE";
pub const RATE_TAG: &str = "RATE";

/// Tag the device uses for heartbeat samples. Firmware builds differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SampleTag {
    #[default]
    Beat,
    Data,
}

impl SampleTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SampleTag::Beat => "BEAT",
            SampleTag::Data => "DATA",
        }
    }
}

/// Maps raw lines to [`Record`]s. Holds no state beyond the configured sample tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    sample_tag: SampleTag,
}

impl Classifier {
    pub fn new(sample_tag: SampleTag) -> Self {
        Self { sample_tag }
    }

    pub fn classify(&self, line: &str) -> Record {
        match self.try_classify(line) {
            Ok(record) => record,
            Err(reason) => Record::Unrecognized {
                raw: line.to_string(),
                reason,
            },
        }
    }

    fn try_classify(&self, line: &str) -> Result<Record, Unrecognized> {
        // Serial reads may leave a carriage return on the line.
        let line = line.trim_end_matches(['\r', '\n']);
        let tag = line.get(..TAG_LEN).ok_or(Unrecognized::TooShort)?;
        let payload = line.get(PAYLOAD_START..).unwrap_or("");

        if tag == MODE_TAG {
            let mode = payload.chars().next().ok_or_else(|| Unrecognized::MissingPayload {
                tag: tag.to_string(),
            })?;
            Ok(Record::ModeChange { mode })
        } else if tag == self.sample_tag.as_str() {
            let text = payload.trim();
            if text.is_empty() {
                return Err(Unrecognized::MissingPayload {
                    tag: tag.to_string(),
                });
            }
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Record::BeatSample { value }),
                _ => Err(Unrecognized::NotANumber(text.to_string())),
            }
        } else if tag == RATE_TAG {
            let text = payload.trim();
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (None, _) => Err(Unrecognized::MissingPayload {
                    tag: tag.to_string(),
                }),
                (Some(c), None) => RateCode::from_char(c)
                    .map(|code| Record::RateEvent { code })
                    .ok_or_else(|| Unrecognized::UnknownRateCode(text.to_string())),
                _ => Err(Unrecognized::UnknownRateCode(text.to_string())),
            }
        } else {
            Err(Unrecognized::UnknownTag(tag.to_string()))
        }
    }
}
