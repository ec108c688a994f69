//! Rendering of command results, as plain text or JSON.
//!
//! Single results print as pretty JSON; stream updates print one compact
//! JSON object per line so they can be piped.

use std::io::{self, Write};

use anyhow::Result;
use huddle::{Device, Session, SessionDevice, WaitForSessionResponse};
use huddleconf::{ConfigSources, HuddleConfig};
use serde_json::json;

pub struct Output<W = io::Stdout> {
    json: bool,
    writer: W,
}

impl Output<io::Stdout> {
    pub fn stdout(json: bool) -> Self {
        Self::new(json, io::stdout())
    }
}

impl<W: Write> Output<W> {
    pub fn new(json: bool, writer: W) -> Self {
        Self { json, writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn session(&mut self, session: &Session) -> Result<()> {
        if self.json {
            writeln!(self.writer, "{}", serde_json::to_string_pretty(session)?)?;
        } else {
            writeln!(self.writer, "{}", session_line(session))?;
        }
        Ok(())
    }

    pub fn sessions(&mut self, sessions: &[Session]) -> Result<()> {
        if self.json {
            writeln!(self.writer, "{}", serde_json::to_string_pretty(sessions)?)?;
        } else if sessions.is_empty() {
            writeln!(self.writer, "No sessions")?;
        } else {
            for session in sessions {
                writeln!(self.writer, "{}", session_line(session))?;
            }
        }
        Ok(())
    }

    pub fn devices(&mut self, devices: &[Device]) -> Result<()> {
        if self.json {
            writeln!(self.writer, "{}", serde_json::to_string_pretty(devices)?)?;
        } else if devices.is_empty() {
            writeln!(self.writer, "No devices waiting")?;
        } else {
            for device in devices {
                writeln!(self.writer, "{}\t{}", device.id, device.name)?;
            }
        }
        Ok(())
    }

    pub fn deleted(&mut self, session_id: u64) -> Result<()> {
        if self.json {
            writeln!(self.writer, "{}", json!({ "deleted": session_id }))?;
        } else {
            writeln!(self.writer, "Deleted session {}", session_id)?;
        }
        Ok(())
    }

    /// One line per update, including updates that carry no session.
    pub fn session_ready(&mut self, update: &WaitForSessionResponse) -> Result<()> {
        if self.json {
            writeln!(self.writer, "{}", serde_json::to_string(update)?)?;
            return Ok(());
        }
        match &update.session {
            Some(session) => writeln!(self.writer, "ready\t{}", session_line(session))?,
            None => writeln!(self.writer, "ready\t-")?,
        }
        Ok(())
    }

    pub fn session_device(&mut self, update: Option<&SessionDevice>) -> Result<()> {
        let Some(update) = update else {
            if self.json {
                writeln!(self.writer, "null")?;
            } else {
                writeln!(self.writer, "session -\tdevice -\t-")?;
            }
            return Ok(());
        };
        let state = update.state().as_str();
        if self.json {
            let line = json!({
                "session_id": update.session_id,
                "device": update.device,
                "state": state,
            });
            writeln!(self.writer, "{}", line)?;
        } else {
            let device = match &update.device {
                Some(device) => format!("{} ({})", device.id, device.name),
                None => "-".to_string(),
            };
            writeln!(
                self.writer,
                "session {}\tdevice {}\t{}",
                update.session_id, device, state
            )?;
        }
        Ok(())
    }

    pub fn config(&mut self, config: &HuddleConfig, sources: &ConfigSources) -> Result<()> {
        if self.json {
            let files: Vec<String> = sources
                .files
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            let value = json!({
                "config": config,
                "sources": { "files": files, "env": sources.env_overrides },
            });
            writeln!(self.writer, "{}", serde_json::to_string_pretty(&value)?)?;
            return Ok(());
        }

        write!(self.writer, "{}", config.to_toml())?;
        writeln!(self.writer)?;
        if sources.files.is_empty() {
            writeln!(self.writer, "# no config files loaded")?;
        }
        for file in &sources.files {
            writeln!(self.writer, "# file: {}", file.display())?;
        }
        for var in &sources.env_overrides {
            writeln!(self.writer, "# env: {}", var)?;
        }
        Ok(())
    }
}

fn session_line(session: &Session) -> String {
    let devices: Vec<String> = session.device_ids.iter().map(|id| id.to_string()).collect();
    format!("{}\t{}\t[{}]", session.id, session.name, devices.join(","))
}
