//! Incoming-webhook document: one attachment carrying the release summary.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon_emoji: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    pub unfurl_links: bool,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    pub fallback: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pretext: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_icon: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footer: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub short: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Field {
    fn short(title: &str, value: &str) -> Self {
        Field {
            title: title.to_string(),
            value: value.to_string(),
            short: true,
        }
    }
}

impl Action {
    fn button(text: &str, url: &str) -> Self {
        Action {
            kind: "button".to_string(),
            text: text.to_string(),
            url: url.to_string(),
        }
    }
}

impl Webhook {
    pub fn from_config(config: &Config) -> Self {
        let fields = vec![
            Field::short("Version", &config.title),
            Field::short("Variants", &config.variants),
            Field::short("Built from", &config.built_from),
            Field::short("Triggered by", &config.actor),
        ];
        let actions = vec![
            Action::button("Changelog", &config.changelog_url),
            Action::button("Downloads", &config.releases_url),
        ];

        Webhook {
            text: String::new(),
            username: config.username.clone(),
            icon_url: config.icon_url.clone(),
            icon_emoji: config.icon_emoji.clone(),
            channel: config.channel.clone(),
            unfurl_links: config.unfurl_links,
            attachments: vec![Attachment {
                text: String::new(),
                title: String::new(),
                fallback: config.fallback.clone(),
                pretext: config.pretext.clone(),
                color: config.color.clone(),
                author_name: String::new(),
                author_link: String::new(),
                author_icon: String::new(),
                footer: config.footer.clone(),
                fields,
                actions,
            }],
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn config(vars: &[(&str, &str)]) -> Config {
        let mut all = vec![
            ("SLACK_WEBHOOK", "https://hooks.example.com/x"),
            ("SLACK_MESSAGE", "Build 41 is live"),
        ];
        all.extend_from_slice(vars);
        Config::from_lookup(|name| {
            all.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    fn encode(hook: &Webhook) -> Value {
        serde_json::from_slice(&hook.to_json().unwrap()).unwrap()
    }

    #[test]
    fn fixed_field_and_action_layout() {
        let hook = Webhook::from_config(&config(&[]));
        assert_eq!(hook.attachments.len(), 1);
        let att = &hook.attachments[0];

        let titles: Vec<_> = att.fields.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, ["Version", "Variants", "Built from", "Triggered by"]);
        assert!(att.fields.iter().all(|f| f.short));

        let labels: Vec<_> = att.actions.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(labels, ["Changelog", "Downloads"]);
        assert!(att.actions.iter().all(|a| a.kind == "button"));
    }

    #[test]
    fn minimal_document_omits_empty_values() {
        let json = encode(&Webhook::from_config(&config(&[])));

        assert_eq!(json["unfurl_links"], Value::Bool(false));
        for key in ["text", "username", "icon_url", "icon_emoji", "channel"] {
            assert!(json.get(key).is_none(), "{key} should be omitted");
        }

        let att = &json["attachments"][0];
        assert_eq!(att["fallback"], "Build 41 is live");
        assert_eq!(att["color"], "good");
        for key in ["text", "title", "pretext", "author_name", "author_link", "author_icon", "footer"] {
            assert!(att.get(key).is_none(), "{key} should be omitted");
        }

        // Unset version: the field keeps its title but drops the value.
        assert_eq!(att["fields"][0], serde_json::json!({"title": "Version", "short": true}));
        assert_eq!(
            att["fields"][3],
            serde_json::json!({"title": "Triggered by", "value": "N/A", "short": true})
        );
        assert_eq!(att["actions"][0], serde_json::json!({"type": "button", "text": "Changelog"}));
    }

    #[test]
    fn decoded_document_reproduces_configured_values() {
        let cfg = config(&[
            ("SLACK_USERNAME", "release-bot"),
            ("SLACK_ICON", "https://example.com/icon.png"),
            ("SLACK_CHANNEL", "#releases"),
            ("SLACK_TITLE", "2.3.0"),
            ("SLACK_COLOR", "#36a64f"),
            ("SLACK_PRETEXT", "New release"),
            ("SLACK_FOOTER", "ci"),
            ("GITHUB_ACTOR", "octocat"),
            ("GITHUB_REF", "refs/heads/main"),
            ("CHANGELOG_URL", "https://example.com/changelog"),
            ("RELEASES_URL", "https://example.com/releases"),
            ("VARIANTS", "arm64, x86_64"),
        ]);
        let hook = Webhook::from_config(&cfg);
        let decoded: Webhook = serde_json::from_slice(&hook.to_json().unwrap()).unwrap();
        assert_eq!(decoded, hook);

        let att = &decoded.attachments[0];
        assert_eq!(decoded.username, "release-bot");
        assert_eq!(decoded.channel, "#releases");
        assert_eq!(att.color, "#36a64f");
        assert_eq!(att.fields[0].value, "2.3.0");
        assert_eq!(att.fields[1].value, "arm64, x86_64");
        assert_eq!(att.fields[2].value, "main");
        assert_eq!(att.fields[3].value, "octocat");
        assert_eq!(att.actions[0].url, "https://example.com/changelog");
        assert_eq!(att.actions[1].url, "https://example.com/releases");
    }

    #[test]
    fn unfurl_links_follows_config() {
        let json = encode(&Webhook::from_config(&config(&[("SLACK_UNFURL_LINKS", "yes")])));
        assert_eq!(json["unfurl_links"], Value::Bool(true));
    }
}
