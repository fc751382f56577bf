//! Best-effort copy to the system clipboard.
//!
//! The primary path pipes the text into whichever platform tool is on
//! `PATH`. If none works and stderr is a terminal, the fallback writes an
//! OSC 52 escape sequence, which most terminal emulators turn into a
//! clipboard write. There is no
//! retry; the outcome only decides whether "Copied" is printed.

use crate::error::SpanError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, error};
use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), SpanError>;
}

/// `(program, args)` candidates in the order they are tried.
const TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), SpanError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpanError::Clipboard(format!("{}: {}", program, e)))?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| SpanError::Clipboard(format!("{}: {}", program, e)))?;
        }

        let status = child
            .wait()
            .map_err(|e| SpanError::Clipboard(format!("{}: {}", program, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(SpanError::Clipboard(format!("{} exited with {}", program, status)))
        }
    }

    fn copy_with_tools(text: &str) -> Result<(), SpanError> {
        let mut last = SpanError::Clipboard("no clipboard tool found".to_string());
        for (program, args) in TOOLS {
            match Self::pipe_to(program, args, text) {
                Ok(()) => {
                    debug!("copied {} bytes with {}", text.len(), program);
                    return Ok(());
                }
                Err(e) => last = e,
            }
        }
        Err(last)
    }

    fn copy_with_osc52(text: &str) -> Result<(), SpanError> {
        // stderr keeps stdout clean for --format json
        let mut stderr = std::io::stderr();
        if !stderr.is_terminal() {
            return Err(SpanError::Clipboard("no terminal for OSC 52".to_string()));
        }
        stderr
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| stderr.flush())
            .map_err(|e| SpanError::Clipboard(e.to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), SpanError> {
        match Self::copy_with_tools(text) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Failed to copy: {}", e);
                Self::copy_with_osc52(text).inspect_err(|e| error!("Fallback copy failed: {}", e))
            }
        }
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
