//! External translator invocation.
//!
//! The translator is a script run by an interpreter, e.g. `node main.js`.
//! Whatever it prints, on stdout or stderr, is the result. The exit status
//! is logged but not otherwise interpreted.

use crate::config::TranslatorConfig;
use crate::process::{run_captured, ProcessError};
use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub source_lang: String,
    pub target_lang: String,
    pub text: String,
}

pub trait Translator: Send + Sync + 'static {
    fn translate(
        &self,
        request: &TranslationRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String, TranslateError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Could not start `{program}`: {source}")]
    Unavailable {
        program: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Process(ProcessError),
}

impl From<ProcessError> for TranslateError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Spawn { program, source } => TranslateError::Unavailable { program, source },
            other => TranslateError::Process(other),
        }
    }
}

impl TranslateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TranslateError::Process(ProcessError::Cancelled { .. }))
    }
}

/// `<program> <script> --srclang=<src> --targetlang=<dst> --text=<text>`
#[derive(Debug, Clone)]
pub struct ScriptTranslator {
    program: PathBuf,
    script: PathBuf,
    timeout: Duration,
}

impl ScriptTranslator {
    pub fn new(program: impl Into<PathBuf>, script: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
            timeout,
        }
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(&config.program, &config.script, config.timeout())
    }

    fn command(&self, request: &TranslationRequest) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(&self.script)
            .arg(format!("--srclang={}", request.source_lang))
            .arg(format!("--targetlang={}", request.target_lang))
            .arg(format!("--text={}", request.text));
        command
    }
}

impl Translator for ScriptTranslator {
    async fn translate(
        &self,
        request: &TranslationRequest,
        cancel: &CancellationToken,
    ) -> Result<String, TranslateError> {
        let start = Instant::now();
        log::info!(
            "[TRANSLATE] {} → {}, {} chars",
            request.source_lang,
            request.target_lang,
            request.text.len()
        );

        let output = run_captured(self.command(request), None, self.timeout, cancel).await?;

        if !output.status.success() {
            log::warn!("[TRANSLATE] Translator exited with {}", output.status);
        }
        log::info!(
            "[TRANSLATE] Done in {:.0}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(output.text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest {
            source_lang: "en".to_string(),
            target_lang: "hu".to_string(),
            text: text.to_string(),
        }
    }

    fn script(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.sh", name, std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn passes_languages_and_text_as_flags() {
        let path = script("echo-args", "for a in \"$@\"; do echo \"$a\"; done");
        let translator = ScriptTranslator::new("sh", &path, Duration::from_secs(10));

        let out = translator
            .translate(&request("Hello world"), &CancellationToken::new())
            .await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(
            out.unwrap(),
            "--srclang=en\n--targetlang=hu\n--text=Hello world\n"
        );
    }

    #[tokio::test]
    async fn stderr_and_failure_status_are_still_the_result() {
        let path = script("fail", "echo 'no network' 1>&2; exit 2");
        let translator = ScriptTranslator::new("sh", &path, Duration::from_secs(10));

        let out = translator
            .translate(&request("x"), &CancellationToken::new())
            .await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(out.unwrap(), "no network\n");
    }

    #[tokio::test]
    async fn non_utf8_output_is_still_shown() {
        let path = script("latin1", "printf 'Szia vil\\341g\\nok\\n'");
        let translator = ScriptTranslator::new("sh", &path, Duration::from_secs(10));

        let out = translator
            .translate(&request("x"), &CancellationToken::new())
            .await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(out.unwrap(), "Szia vil\u{FFFD}g\nok\n");
    }

    #[tokio::test]
    async fn missing_interpreter_is_unavailable() {
        let translator =
            ScriptTranslator::new("no-such-node-4242", "main.js", Duration::from_secs(10));
        let err = translator
            .translate(&request("x"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Unavailable { .. }));
        assert!(!err.is_cancelled());
    }

    #[tokio::test]
    async fn hung_translator_is_killed_after_timeout() {
        let path = script("hang", "sleep 30");
        let translator = ScriptTranslator::new("sh", &path, Duration::from_millis(200));

        let err = translator
            .translate(&request("x"), &CancellationToken::new())
            .await
            .unwrap_err();
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            err,
            TranslateError::Process(ProcessError::TimedOut { .. })
        ));
    }
}
