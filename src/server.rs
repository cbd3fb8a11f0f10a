//! Stdio Form Server
//!
//! Newline-delimited JSON front end for the form reducer. Each request
//! line gets exactly one reply line; bad input is answered with an error
//! and never ends the session.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::form::{Field, FormEngine, FormState, SubmissionResult};

/// One input event from the presentation layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Request {
    Change { field: Field, value: String },
    Submit,
    Reset,
}

/// Reply written for every request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Reply {
    State(FormState),
    Submitted(SubmissionResult),
    Error(String),
}

/// Form state for one connected presentation layer
#[derive(Debug, Clone)]
pub struct Session {
    engine: FormEngine,
    state: FormState,
}

impl Session {
    pub fn new(engine: FormEngine) -> Self {
        let state = engine.reset();
        Self { engine, state }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn handle(&mut self, request: Request) -> Reply {
        match request {
            Request::Change { field, value } => {
                self.state = self.engine.on_field_change(&self.state, field, &value);
                Reply::State(self.state.clone())
            }
            Request::Submit => match self.engine.on_submit(&self.state) {
                Ok(result) => Reply::Submitted(result),
                Err(e) => Reply::Error(e.to_string()),
            },
            Request::Reset => {
                self.state = self.engine.reset();
                Reply::State(self.state.clone())
            }
        }
    }

    /// Parse and handle one raw request line
    pub fn handle_line(&mut self, line: &[u8]) -> Reply {
        match serde_json::from_slice::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => {
                log::warn!("Malformed request: {}", e);
                Reply::Error(format!("malformed request: {}", e))
            }
        }
    }
}

/// Serve requests from `reader` until EOF, writing replies to `writer`
pub async fn serve<R, W>(engine: FormEngine, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::new(engine);
    let mut buf = Vec::new();

    // Raw bytes, so a line that is not UTF-8 is answered like any other bad request
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let reply = session.handle_line(line);
        let mut out = serde_json::to_vec(&reply)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    log::info!("Input closed, shutting down");
    Ok(())
}

/// Serve over the process's stdin and stdout
pub async fn serve_stdio(engine: FormEngine) -> Result<()> {
    serve(engine, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardTypeRegistry;
    use crate::form::Clock;
    use crate::validation::YearMonth;
    use serde_json::{json, Value};

    fn engine() -> FormEngine {
        FormEngine::new(CardTypeRegistry::builtin()).with_clock(Clock::Fixed(YearMonth::new(2026, 10)))
    }

    async fn run(input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve(engine(), input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_parse_requests() {
        let request: Request =
            serde_json::from_str(r#"{"event":"change","field":"cvv","value":"123"}"#).unwrap();
        assert_eq!(
            request,
            Request::Change {
                field: Field::Cvv,
                value: "123".to_string()
            }
        );
        let request: Request = serde_json::from_str(r#"{"event":"submit"}"#).unwrap();
        assert_eq!(request, Request::Submit);
    }

    #[tokio::test]
    async fn one_reply_per_request() {
        let replies = run(concat!(
            r#"{"event":"change","field":"number","value":"4532015112830366"}"#,
            "\n\n",
            r#"{"event":"submit"}"#,
            "\n",
            "not json\n",
            r#"{"event":"reset"}"#,
            "\n",
        ))
        .await;

        assert_eq!(replies.len(), 4);
        assert_eq!(replies[0]["state"]["number"]["value"], "4532 0151 1283 0366");
        assert_eq!(replies[0]["state"]["detectedType"]["name"], "Visa");
        assert!(replies[1]["error"].as_str().unwrap().contains("expiry"));
        assert!(replies[2]["error"].as_str().unwrap().starts_with("malformed request"));
        assert_eq!(replies[3]["state"]["number"]["value"], "");
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_session() {
        let input: &[u8] = b"\xff\xfe garbage\n{\"event\":\"reset\"}\n";
        let mut output = Vec::new();
        serve(engine(), input, &mut output).await.unwrap();

        let replies: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 2);
        assert!(replies[0]["error"].as_str().unwrap().starts_with("malformed request"));
        assert_eq!(replies[1]["state"]["canSubmit"], false);
    }

    #[tokio::test]
    async fn full_form_submits() {
        let replies = run(concat!(
            r#"{"event":"change","field":"number","value":"4532 0151 1283 0366"}"#,
            "\n",
            r#"{"event":"change","field":"expiry","value":"12/30"}"#,
            "\n",
            r#"{"event":"change","field":"cvv","value":"123"}"#,
            "\n",
            r#"{"event":"change","field":"holderName","value":"JOHN DOE"}"#,
            "\n",
            r#"{"event":"submit"}"#,
            "\n",
        ))
        .await;

        assert_eq!(replies[3]["state"]["canSubmit"], true);
        assert_eq!(replies[4], json!({ "submitted": { "cardTypeName": "Visa" } }));
    }
}
