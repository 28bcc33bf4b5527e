//! Chatbot data lookup.
//!
//! The natural-language side of the chatbot is an external intent classifier.
//! This module parses its JSON output and answers the intents that need
//! gradebook data; everything else is passed through as the classifier's text.

mod intent;
mod responder;

pub use intent::{ClassifiedIntent, ClassifierResponse, Entities, IntentKind, parse_classifier_output};
pub use responder::{FALLBACK_ANSWER, answer};
