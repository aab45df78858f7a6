//! sleep: Delay for a specified time, emitting nothing.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{ChainError, ChainResult, FilterError};
use crate::stages::{BuildContext, Source, StageBody, StageFactory, StageRole, StageSchema};

/// Sleep stage: a source that waits, then ends the stream.
pub struct Sleep;

impl StageFactory for Sleep {
    fn name(&self) -> &str {
        "sleep"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new(
            "sleep",
            "Wait for a duration (s, m, h, d suffixes; decimals allowed)",
            "sleep <seconds>",
            StageRole::Source,
        )
    }

    fn build(&self, args: &[String], _ctx: &BuildContext) -> ChainResult<StageBody> {
        let raw = match args {
            [] => return Err(ChainError::RequiresParameter("sleep".to_string())),
            [raw] => raw,
            _ => return Err(ChainError::invalid("sleep", "expects a single duration")),
        };

        let seconds = parse_duration(raw).map_err(|e| ChainError::invalid("sleep", e))?;
        let duration = Duration::try_from_secs_f64(seconds)
            .map_err(|_| ChainError::invalid("sleep", "invalid time interval"))?;

        Ok(StageBody::source(Delay {
            duration: Some(duration),
        }))
    }
}

struct Delay {
    duration: Option<Duration>,
}

#[async_trait]
impl Source for Delay {
    async fn next_line(&mut self) -> Result<Option<String>, FilterError> {
        if let Some(duration) = self.duration.take() {
            tokio::time::sleep(duration).await;
        }
        Ok(None)
    }
}

/// Parse duration string with optional suffix (s, m, h, d).
fn parse_duration(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("missing operand".to_string());
    }

    let (num_str, multiplier) = if let Some(rest) = s.strip_suffix('s') {
        (rest, 1.0)
    } else if let Some(rest) = s.strip_suffix('m') {
        (rest, 60.0)
    } else if let Some(rest) = s.strip_suffix('h') {
        (rest, 3600.0)
    } else if let Some(rest) = s.strip_suffix('d') {
        (rest, 86400.0)
    } else {
        (s, 1.0)
    };

    num_str
        .parse::<f64>()
        .map(|n| n * multiplier)
        .map_err(|_| format!("invalid time interval '{}'", s))
}
