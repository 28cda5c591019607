//! Moderation module for screening generated text.

mod client;

pub use client::{
    ModerationClient, ModerationConfig, ModerationError, ModerationService, ModerationVerdict,
};
