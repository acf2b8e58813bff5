//! Outgoing chat notification.
//!
//! Posts an MS Teams Adaptive Card to a webhook URL announcing the next
//! rollout step for a staged release.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Environment variable holding an optional payload-signing secret.
pub const SECRET_ENV: &str = "STAGECAST_WEBHOOK_SECRET";

/// Environment variable holding an optional Play Console URL for the
/// card's halt button.
pub const CONSOLE_URL_ENV: &str = "STAGECAST_CONSOLE_URL";

/// Notification input: the decision the core arrived at.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutUpdate {
    /// Application package name.
    pub package_name: String,

    /// Track the release is rolling out on.
    pub track: String,

    /// Fraction of users currently receiving the release.
    pub current_fraction: f64,

    /// Next configured fraction, or `None` when the schedule is exhausted.
    pub next_fraction: Option<f64>,
}

/// Webhook payload envelope for an Adaptive Card message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPayload {
    #[serde(rename = "type")]
    pub kind: String,

    pub attachments: Vec<CardAttachment>,
}

/// One card attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAttachment {
    pub content_type: String,

    pub content: Value,
}

/// Result of one delivery attempt.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// HTTP status code, if a response was received.
    pub status_code: Option<u16>,

    /// Whether the webhook accepted the message.
    pub success: bool,

    /// Error message, if delivery failed.
    pub error: Option<String>,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// Webhook notifier for rollout updates.
pub struct CardNotifier {
    client: reqwest::blocking::Client,
    url: String,
    secret: Option<String>,
    console_url: Option<String>,
    timeout: Duration,
}

impl CardNotifier {
    /// Create a notifier for the given webhook URL.
    ///
    /// Picks up the signing secret and console link from the environment.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            url: url.into(),
            secret: std::env::var(SECRET_ENV).ok().filter(|s| !s.is_empty()),
            console_url: std::env::var(CONSOLE_URL_ENV).ok().filter(|s| !s.is_empty()),
            timeout: Duration::from_secs(30),
        }
    }

    /// Post an update card to the webhook.
    ///
    /// The webhook counts both 200 and 202 as accepted. Delivery failure is
    /// reported in the result, never panicked or escalated.
    pub fn send(&self, update: &RolloutUpdate) -> Delivery {
        let start = std::time::Instant::now();

        let payload = build_card(update, self.console_url.as_deref());
        let body = match serde_json::to_string(&payload) {
            Ok(b) => b,
            Err(e) => {
                return Delivery {
                    status_code: None,
                    success: false,
                    error: Some(format!("serialization failed: {e}")),
                    duration_ms: start.elapsed().as_millis() as u64,
                };
            }
        };

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("User-Agent", format!("stagecast/{}", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout);

        if let Some(ref secret) = self.secret {
            request = request.header("X-Stagecast-Signature", compute_signature(secret, &body));
        }

        match request.body(body).send() {
            Ok(response) => {
                let status = response.status().as_u16();
                let accepted = status == 200 || status == 202;
                Delivery {
                    status_code: Some(status),
                    success: accepted,
                    error: (!accepted).then(|| {
                        format!("HTTP {status}: {}", response.text().unwrap_or_default())
                    }),
                    duration_ms: start.elapsed().as_millis() as u64,
                }
            }
            Err(e) => Delivery {
                status_code: None,
                success: false,
                error: Some(e.to_string()),
                duration_ms: start.elapsed().as_millis() as u64,
            },
        }
    }
}

/// Render a fraction as a percentage without trailing noise (0.05 -> "5").
fn percent(fraction: f64) -> String {
    let value = fraction * 100.0;
    // Tolerance absorbs the float error of fraction * 100 round trips.
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value}")
    }
}

/// Build the Adaptive Card payload for an update.
///
/// Card layout follows the adaptivecards.io 1.2 schema: a headline, the
/// rollout sentence, and an optional halt button linking to the console.
#[must_use]
pub fn build_card(update: &RolloutUpdate, console_url: Option<&str>) -> CardPayload {
    let today = chrono::Local::now().format("%A, %-d %B").to_string();

    let summary = match update.next_fraction {
        Some(next) => format!(
            "The staged release of {} on the {} track will increase from {}% to {}% on {}.",
            update.package_name,
            update.track,
            percent(update.current_fraction),
            percent(next),
            today,
        ),
        None => format!(
            "The staged release of {} on the {} track is at {}%, at or above the highest \
             configured step. No further increase is scheduled.",
            update.package_name,
            update.track,
            percent(update.current_fraction),
        ),
    };

    let mut content = json!({
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "type": "AdaptiveCard",
        "version": "1.2",
        "body": [
            {
                "type": "TextBlock",
                "size": "Medium",
                "weight": "Bolder",
                "text": "Staged Rollout Update"
            },
            {
                "type": "TextBlock",
                "text": summary,
                "wrap": true
            }
        ]
    });

    if let Some(url) = console_url {
        content["actions"] = json!([
            {
                "type": "Action.OpenUrl",
                "title": "Open track in Play Console",
                "url": url,
                "style": "destructive"
            }
        ]);
    }

    CardPayload {
        kind: "message".to_string(),
        attachments: vec![CardAttachment {
            content_type: "application/vnd.microsoft.card.adaptive".to_string(),
            content,
        }],
    }
}

/// Compute a SHA-256 signature for the payload body.
fn compute_signature(secret: &str, body: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(body.as_bytes());
    let result = hasher.finalize();

    format!("sha256={:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(next: Option<f64>) -> RolloutUpdate {
        RolloutUpdate {
            package_name: "com.example.app".to_string(),
            track: "production".to_string(),
            current_fraction: 0.05,
            next_fraction: next,
        }
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(0.05), "5");
        assert_eq!(percent(0.2), "20");
        assert_eq!(percent(1.0), "100");
        assert_eq!(percent(0.125), "12.5");
        assert_eq!(percent(0.0), "0");
    }

    #[test]
    fn test_card_announces_next_step() {
        let payload = build_card(&update(Some(0.2)), None);
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("from 5% to 20%"));
        assert!(json.contains("com.example.app"));
        assert!(json.contains("production"));
    }

    #[test]
    fn test_card_for_exhausted_schedule() {
        let payload = build_card(&update(None), None);
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("at or above the highest configured step"));
        assert!(!json.contains("will increase"));
    }

    #[test]
    fn test_card_envelope_shape() {
        let payload = build_card(&update(Some(0.2)), None);
        assert_eq!(payload.kind, "message");
        assert_eq!(payload.attachments.len(), 1);
        assert_eq!(
            payload.attachments[0].content_type,
            "application/vnd.microsoft.card.adaptive"
        );
        assert_eq!(payload.attachments[0].content["version"], "1.2");
    }

    #[test]
    fn test_card_halt_action_only_with_console_url() {
        let without = build_card(&update(Some(0.2)), None);
        assert!(without.attachments[0].content.get("actions").is_none());

        let with = build_card(&update(Some(0.2)), Some("https://play.google.com/console"));
        let actions = &with.attachments[0].content["actions"];
        assert_eq!(actions[0]["type"], "Action.OpenUrl");
        assert_eq!(actions[0]["url"], "https://play.google.com/console");
    }

    #[test]
    fn test_compute_signature_prefix() {
        let sig = compute_signature("secret", "body");
        assert!(sig.starts_with("sha256="));
        assert_eq!(sig, compute_signature("secret", "body"));
    }

    #[test]
    fn test_payload_round_trips() {
        let payload = build_card(&update(Some(0.5)), None);
        let json = serde_json::to_string(&payload).unwrap();
        let back: CardPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, "message");
    }
}
