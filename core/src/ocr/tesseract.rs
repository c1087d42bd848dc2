//! Tesseract via its command-line front end.
//!
//! The image is PNG-encoded and piped in; recognized text comes back on
//! stdout. Stderr carries diagnostics and only surfaces in engine errors.
//! `tesseract stdin stdout -l <lang> --oem <mode> [--psm n] [--tessdata-dir d]`

use super::{OcrError, TextRecognizer};
use crate::capture::encode_png;
use crate::config::{OcrConfig, OcrEngineMode};
use crate::process::run_captured;
use image::DynamicImage;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
    language: String,
    engine_mode: OcrEngineMode,
    page_seg_mode: Option<u8>,
    tessdata_dir: Option<PathBuf>,
    timeout: Duration,
}

impl TesseractCli {
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            program: config.program.clone(),
            language: config.language.clone(),
            engine_mode: config.engine_mode,
            page_seg_mode: config.page_seg_mode,
            tessdata_dir: config.tessdata_dir.clone(),
            timeout: config.timeout(),
        }
    }

    /// Whether the program resolves on PATH (or exists, for absolute paths).
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--oem".to_string(),
            self.engine_mode.as_oem().to_string(),
        ];
        if let Some(psm) = self.page_seg_mode {
            args.push("--psm".to_string());
            args.push(psm.to_string());
        }
        if let Some(dir) = &self.tessdata_dir {
            args.push("--tessdata-dir".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }
        args
    }
}

impl TextRecognizer for TesseractCli {
    async fn recognize(
        &self,
        image: DynamicImage,
        cancel: &CancellationToken,
    ) -> Result<String, OcrError> {
        let start = Instant::now();
        let png = encode_png(&image)?;

        let mut command = Command::new(&self.program);
        command.args(self.args());

        let output = run_captured(command, Some(png), self.timeout, cancel).await?;
        if !output.status.success() {
            return Err(OcrError::Engine {
                code: output.status.code(),
                output: output.stderr,
            });
        }
        if !output.stderr.is_empty() {
            log::debug!("[OCR] tesseract diagnostics: {}", output.stderr.trim_end());
        }

        log::info!(
            "[OCR] tesseract ({}x{}): {} chars in {:.0}ms",
            image.width(),
            image.height(),
            output.stdout.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_follow_configuration() {
        let config = OcrConfig {
            language: "hun".to_string(),
            engine_mode: OcrEngineMode::LstmOnly,
            page_seg_mode: Some(6),
            tessdata_dir: Some(PathBuf::from("/data/tess")),
            ..OcrConfig::default()
        };
        let args = TesseractCli::from_config(&config).args();
        assert_eq!(
            args,
            vec![
                "stdin",
                "stdout",
                "-l",
                "hun",
                "--oem",
                "1",
                "--psm",
                "6",
                "--tessdata-dir",
                "/data/tess"
            ]
        );
    }

    #[test]
    fn default_arguments_omit_optional_flags() {
        let args = TesseractCli::from_config(&OcrConfig::default()).args();
        assert_eq!(args, vec!["stdin", "stdout", "-l", "eng", "--oem", "3"]);
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let config = OcrConfig {
            program: PathBuf::from("definitely-not-tesseract-4242"),
            ..OcrConfig::default()
        };
        assert!(!TesseractCli::from_config(&config).is_available());
    }

    #[cfg(unix)]
    mod with_fake_engine {
        use super::*;
        use image::RgbaImage;
        use std::os::unix::fs::PermissionsExt;

        fn fake_engine(name: &str, body: &str) -> PathBuf {
            let path = std::env::temp_dir().join(format!("{}-{}", name, std::process::id()));
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn engine_at(program: PathBuf) -> TesseractCli {
            TesseractCli::from_config(&OcrConfig {
                program,
                ..OcrConfig::default()
            })
        }

        fn blank() -> DynamicImage {
            DynamicImage::ImageRgba8(RgbaImage::new(16, 16))
        }

        #[tokio::test]
        async fn stdout_is_the_recognized_text() {
            let program = fake_engine(
                "fake-tesseract-ok",
                "cat > /dev/null; echo \"lang=$4 oem=$6\"; echo Hello",
            );
            let text = engine_at(program.clone())
                .recognize(blank(), &CancellationToken::new())
                .await;
            let _ = std::fs::remove_file(&program);

            assert_eq!(text.unwrap(), "lang=eng oem=3\nHello\n");
        }

        #[tokio::test]
        async fn diagnostics_on_stderr_stay_out_of_the_text() {
            let program = fake_engine(
                "fake-tesseract-noisy",
                "cat > /dev/null; echo 'Estimating resolution as 96' 1>&2; echo Hello",
            );
            let text = engine_at(program.clone())
                .recognize(blank(), &CancellationToken::new())
                .await;
            let _ = std::fs::remove_file(&program);

            assert_eq!(text.unwrap(), "Hello\n");
        }

        #[tokio::test]
        async fn non_zero_exit_is_an_engine_error() {
            let program = fake_engine(
                "fake-tesseract-fail",
                "cat > /dev/null; echo partial; echo 'Failed loading language' 1>&2; exit 1",
            );
            let result = engine_at(program.clone())
                .recognize(blank(), &CancellationToken::new())
                .await;
            let _ = std::fs::remove_file(&program);

            match result {
                Err(OcrError::Engine { code, output }) => {
                    assert_eq!(code, Some(1));
                    assert_eq!(output, "Failed loading language\n");
                }
                other => panic!("expected engine error, got {:?}", other),
            }
        }
    }
}
