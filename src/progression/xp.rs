//! Activity experience
//!
//! How much experience chat messages and voice presence are worth.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Messages older than this no longer slow down chat rewards
pub const CHAT_WINDOW: Duration = Duration::from_secs(3 * 60);

/// Chat rewards never fall below this
pub const MIN_CHAT_REWARD: f64 = 1.0;

/// Reward rates, loaded from config
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityRates {
    /// Reward for a chat message when the author has been quiet
    pub experience_per_chat: f64,
    /// Messages within the window before rewards hit the floor
    pub chat_limit: u32,
    /// Reward per minute of voice with active company
    pub experience_per_minute_voice: f64,
    /// Extra per minute while streaming
    pub experience_streaming_bonus: f64,
    /// Multiplier for server boosters
    pub booster_multiplier: f64,
}

impl Default for ActivityRates {
    fn default() -> Self {
        Self {
            experience_per_chat: 5.0,
            chat_limit: 10,
            experience_per_minute_voice: 1.0,
            experience_streaming_bonus: 0.5,
            booster_multiplier: 1.1,
        }
    }
}

impl ActivityRates {
    /// Check rates are usable
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("experience_per_chat", self.experience_per_chat),
            ("experience_per_minute_voice", self.experience_per_minute_voice),
            ("experience_streaming_bonus", self.experience_streaming_bonus),
            ("booster_multiplier", self.booster_multiplier),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a finite number >= 0, got {}", name, value));
            }
        }
        if self.chat_limit == 0 {
            return Err("chat_limit must be at least 1".to_string());
        }
        Ok(())
    }

    /// Reward for a chat message given how many were sent within the window
    pub fn chat_reward(&self, recent_messages: usize, in_voice: bool) -> f64 {
        let decay = 1.0 - recent_messages as f64 / self.chat_limit as f64;
        let reward = (self.experience_per_chat * decay).max(MIN_CHAT_REWARD);
        if in_voice {
            // Talking in voice already earns
            reward / 3.0
        } else {
            reward
        }
    }

    /// Reward for one minute in a voice channel
    pub fn voice_reward(&self, voice: &VoicePresence) -> f64 {
        if voice.in_afk_channel {
            return 0.0;
        }
        let mut reward = 0.0;
        if voice.streaming {
            reward += self.experience_streaming_bonus;
        }
        reward += if voice.is_alone() {
            self.experience_per_minute_voice / 4.0
        } else if voice.others_idle {
            self.experience_per_minute_voice / 3.0
        } else {
            self.experience_per_minute_voice
        };
        reward
    }

    /// Booster bonus
    pub fn boosted(&self, amount: f64, booster: bool) -> f64 {
        if booster {
            amount * self.booster_multiplier
        } else {
            amount
        }
    }
}

/// What the platform reports about a member in voice for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoicePresence {
    /// Connected to the guild's AFK channel
    pub in_afk_channel: bool,
    /// Nobody else is in the channel
    pub alone_in_channel: bool,
    /// Self-muted and self-deafened
    pub muted_and_deafened: bool,
    /// Everyone else is idle or muted and deafened
    pub others_idle: bool,
    pub streaming: bool,
}

impl VoicePresence {
    pub fn is_alone(&self) -> bool {
        self.alone_in_channel || self.muted_and_deafened
    }
}

/// Recent chat timestamps for one member
#[derive(Debug, Clone, Default)]
pub struct ChatWindow {
    sent: VecDeque<Instant>,
}

impl ChatWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message at `now`, returning how many earlier messages are
    /// still inside the window
    pub fn record(&mut self, now: Instant) -> usize {
        while let Some(&oldest) = self.sent.front() {
            if now.saturating_duration_since(oldest) >= CHAT_WINDOW {
                self.sent.pop_front();
            } else {
                break;
            }
        }
        let recent = self.sent.len();
        self.sent.push_back(now);
        recent
    }

    /// No message in the window is recent enough to count at `now`
    pub fn expired(&self, now: Instant) -> bool {
        self.sent
            .back()
            .map_or(true, |&last| now.saturating_duration_since(last) >= CHAT_WINDOW)
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> ActivityRates {
        ActivityRates {
            experience_per_chat: 5.0,
            chat_limit: 10,
            experience_per_minute_voice: 1.2,
            experience_streaming_bonus: 0.5,
            booster_multiplier: 1.1,
        }
    }

    #[test]
    fn test_chat_reward_decays() {
        let r = rates();
        assert_eq!(r.chat_reward(0, false), 5.0);
        assert!((r.chat_reward(4, false) - 3.0).abs() < 1e-9); // 5 * (1 - 4/10)
        assert_eq!(r.chat_reward(9, false), 1.0); // floor
        assert_eq!(r.chat_reward(25, false), 1.0);
    }

    #[test]
    fn test_chat_reward_in_voice() {
        let r = rates();
        assert!((r.chat_reward(0, true) - 5.0 / 3.0).abs() < 1e-9);
        assert!((r.chat_reward(30, true) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_voice_reward() {
        let r = rates();
        let company = VoicePresence::default();
        assert!((r.voice_reward(&company) - 1.2).abs() < 1e-9);

        let alone = VoicePresence { alone_in_channel: true, ..Default::default() };
        assert!((r.voice_reward(&alone) - 0.3).abs() < 1e-9);

        let deaf = VoicePresence { muted_and_deafened: true, others_idle: true, ..Default::default() };
        assert!((r.voice_reward(&deaf) - 0.3).abs() < 1e-9);

        let idle_company = VoicePresence { others_idle: true, ..Default::default() };
        assert!((r.voice_reward(&idle_company) - 0.4).abs() < 1e-9);

        let streaming = VoicePresence { streaming: true, ..Default::default() };
        assert!((r.voice_reward(&streaming) - 1.7).abs() < 1e-9);

        let afk = VoicePresence { in_afk_channel: true, streaming: true, ..Default::default() };
        assert_eq!(r.voice_reward(&afk), 0.0);
    }

    #[test]
    fn test_booster() {
        let r = rates();
        assert!((r.boosted(10.0, true) - 11.0).abs() < 1e-9);
        assert_eq!(r.boosted(10.0, false), 10.0);
    }

    #[test]
    fn test_chat_window() {
        let mut window = ChatWindow::new();
        let start = Instant::now();
        assert_eq!(window.record(start), 0);
        assert_eq!(window.record(start + Duration::from_secs(10)), 1);
        assert_eq!(window.record(start + Duration::from_secs(60)), 2);
        // First message falls out of the window
        assert_eq!(window.record(start + CHAT_WINDOW + Duration::from_secs(5)), 2);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_chat_window_expires() {
        let mut window = ChatWindow::new();
        let start = Instant::now();
        assert!(window.expired(start));
        window.record(start);
        assert!(!window.expired(start + Duration::from_secs(30)));
        assert!(window.expired(start + CHAT_WINDOW));
    }

    #[test]
    fn test_validate() {
        assert!(rates().validate().is_ok());
        let bad = ActivityRates { chat_limit: 0, ..rates() };
        assert!(bad.validate().is_err());
        let bad = ActivityRates { booster_multiplier: f64::NAN, ..rates() };
        assert!(bad.validate().is_err());
    }
}
