use crate::schedule::Activation;
use chrono::{Datelike, Timelike};
use std::fmt::Write;

/// One-shot launchd job, ready to serialize as a property list.
#[derive(Debug, Clone)]
pub struct JobDefinition {
    /// Reverse-domain label, also the descriptor's file name.
    pub label: String,
    /// Command the supervisor runs when the job fires.
    pub program_arguments: Vec<String>,
    pub activation: Activation,
}

impl JobDefinition {
    /// Renders the job as launchd plist XML.
    ///
    /// `LaunchOnlyOnce` is always set; the activation clause is either
    /// `RunAtLoad` (fire as soon as the job is loaded, including on the
    /// next boot) or a `StartCalendarInterval` pinned to day, hour and
    /// minute of the resolved local time.
    pub fn to_plist(&self) -> String {
        let mut args_xml = String::new();
        for arg in &self.program_arguments {
            let _ = writeln!(args_xml, "    <string>{}</string>", xml_escape(arg));
        }

        let activation_xml = match self.activation {
            Activation::Immediate => "  <key>RunAtLoad</key>\n  <true/>\n".to_string(),
            Activation::At(when) => format!(
                "  <key>StartCalendarInterval</key>\n  <dict>\n    <key>Day</key>\n    <integer>{}</integer>\n    <key>Hour</key>\n    <integer>{}</integer>\n    <key>Minute</key>\n    <integer>{}</integer>\n  </dict>\n",
                when.day(),
                when.hour(),
                when.minute()
            ),
        };

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>Label</key>
  <string>{label}</string>
  <key>UserName</key>
  <string>root</string>
  <key>GroupName</key>
  <string>wheel</string>
  <key>LaunchOnlyOnce</key>
  <true/>
  <key>ProgramArguments</key>
  <array>
{args}  </array>
{activation}</dict>
</plist>
"#,
            label = xml_escape(&self.label),
            args = args_xml,
            activation = activation_xml
        )
    }
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn job(activation: Activation) -> JobDefinition {
        JobDefinition {
            label: "io.deferctl.deferred-action".into(),
            program_arguments: vec![
                "/usr/local/bin/jamf".into(),
                "policy".into(),
                "-event".into(),
                "deferred-action-trigger".into(),
            ],
            activation,
        }
    }

    #[test]
    fn immediate_jobs_run_at_load() {
        let plist = job(Activation::Immediate).to_plist();
        assert!(plist.contains("<key>RunAtLoad</key>"));
        assert!(!plist.contains("StartCalendarInterval"));
    }

    #[test]
    fn deferred_jobs_pin_day_hour_and_minute() {
        let when = Local.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap();
        let plist = job(Activation::At(when)).to_plist();
        assert!(plist.contains("<key>StartCalendarInterval</key>"));
        assert!(plist.contains("<key>Day</key>\n    <integer>1</integer>"));
        assert!(plist.contains("<key>Hour</key>\n    <integer>14</integer>"));
        assert!(plist.contains("<key>Minute</key>\n    <integer>0</integer>"));
        assert!(!plist.contains("RunAtLoad"));
    }

    #[test]
    fn jobs_fire_at_most_once() {
        let plist = job(Activation::Immediate).to_plist();
        assert!(plist.contains("<key>LaunchOnlyOnce</key>\n  <true/>"));
    }

    #[test]
    fn program_arguments_keep_their_order() {
        let plist = job(Activation::Immediate).to_plist();
        let jamf = plist.find("<string>/usr/local/bin/jamf</string>").unwrap();
        let trigger = plist
            .find("<string>deferred-action-trigger</string>")
            .unwrap();
        assert!(jamf < trigger);
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let mut custom = job(Activation::Immediate);
        custom.label = "io.deferctl.<test> & co".into();
        let plist = custom.to_plist();
        assert!(plist.contains("io.deferctl.&lt;test&gt; &amp; co"));
    }
}
