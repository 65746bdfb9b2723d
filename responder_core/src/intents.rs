//! Built-in intent table and loading of custom intent files
//!
//! The table is plain data. Order matters: the matcher walks intents and
//! their patterns in declaration order and the first hit wins.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{ResponderError, Result};
use crate::types::Intent;

/// Replies used when no stage recognises the message
pub const FALLBACK_RESPONSES: &[&str] = &[
    "Sorry, I didn’t get that. Could you rephrase?",
    "Hmm, I’m not sure I understood you 🤔",
    "I didn’t quite catch that, can you try again?",
    "I’m still learning! Can you say it differently?",
    "Could you clarify what you mean?",
    "Oops, that went over my head. Can you explain again?",
];

/// The intents shipped with the responder.
pub fn builtin_intents() -> Vec<Intent> {
    vec![
        Intent::new(
            "greet",
            &[
                "hi", "hello", "hey", "good morning", "good evening",
                "morning", "gm", "good afternoon", "afternoon",
                "good night", "night", "hiya", "yo", "sup",
                "hey there", "what’s up", "whats up", "wassup", "wazzup",
                "long time no see", "nice to meet you", "pleased to meet you",
                "howdy", "greetings", "salutations",
                "hola", "bonjour", "namaste", "salaam", "ciao", "aloha",
                "hiya buddy", "hi assistant", "hello friend", "yo assistant",
                "are you there", "anyone there", "knock knock", "hi bot",
                "hello ai", "hello there", "hi there",
            ],
            &[
                "Hello! How can I help you today?",
                "Hey there!",
                "Hi, what’s up?",
                "Hello friend! How are you doing?",
                "Greetings! How may I help?",
                "Hi there, nice to see you!",
                "Hey! I’m here to assist you.",
            ],
        ),
        Intent::new(
            "goodbye",
            &[
                "bye", "goodbye", "see you", "see ya", "later",
                "talk to you later", "catch you later", "farewell",
                "take care", "see you soon", "bye bye",
                "good night", "nighty night", "adios", "ciao",
            ],
            &[
                "Goodbye!",
                "See you later!",
                "Bye! Take care.",
                "Catch you later!",
                "Farewell, friend!",
                "Bye bye 👋",
            ],
        ),
        Intent::new(
            "thanks",
            &[
                "thanks", "thank you", "thx", "ty", "thanks a lot",
                "thank you very much", "many thanks", "appreciate it",
                "thanks so much", "cheers", "much obliged",
            ],
            &[
                "You're welcome!",
                "Glad I could help!",
                "Anytime!",
                "No problem at all!",
                "My pleasure!",
                "Don’t mention it 🙂",
            ],
        ),
        Intent::new(
            "how_are_you",
            &[
                "how are you", "how are you doing", "how’s it going",
                "how do you do", "you good", "are you okay",
                "what’s up with you", "how have you been",
            ],
            &[
                "I’m doing great! How about you?",
                "I’m fine, thanks for asking.",
                "I’m feeling awesome today!",
                "I’m all good and ready to help you!",
                "I’m doing well, how are you doing?",
            ],
        ),
        Intent::new(
            "who_are_you",
            &[
                "who are you", "what are you", "what is your name",
                "who am i talking to", "identify yourself",
            ],
            &[
                "I’m your AI Virtual Assistant 🤖",
                "I’m Ava, your personal AI helper!",
                "I’m your assistant, here to chat and help you.",
            ],
        ),
        Intent::new(
            "feelings",
            &[
                "i am sad", "i feel lonely", "i’m happy", "i am excited",
                "i feel bored", "i’m angry", "i feel nervous",
                "i feel good", "i feel great",
            ],
            &[
                "I hear you. Do you want to talk about it?",
                "That’s great to hear! 🎉",
                "I’m here for you whenever you need me.",
                "It’s okay to feel that way sometimes.",
                "I’m glad you’re sharing your feelings with me.",
            ],
        ),
        Intent::new(
            "compliment",
            &[
                "you are smart", "you are nice", "you are awesome",
                "you are cool", "you are funny", "you are helpful",
                "good job", "well done",
            ],
            &[
                "Aww, thank you! 😊",
                "That means a lot!",
                "Glad you think so!",
                "You’re awesome too!",
            ],
        ),
        Intent::new(
            "insult",
            &[
                "you are stupid", "you are dumb", "you are useless",
                "you are bad", "you are annoying", "you are boring",
            ],
            &[
                "That’s not very nice 😔",
                "I’m still learning, please be patient with me.",
                "I’m sorry you feel that way.",
            ],
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IntentFile {
    #[serde(default)]
    intents: Vec<Intent>,
}

/// Load an intent table from a TOML file of `[[intents]]` tables.
///
/// The file replaces the built-in table entirely; every intent is validated.
pub fn load_intents(path: &Path) -> Result<Vec<Intent>> {
    let content = fs::read_to_string(path).map_err(|e| ResponderError::io(path, e))?;
    let file: IntentFile = toml::from_str(&content)?;

    if file.intents.is_empty() {
        return Err(ResponderError::Config(format!(
            "intent file {} defines no intents",
            path.display()
        )));
    }
    for intent in &file.intents {
        intent.validate()?;
    }

    info!(
        "Loaded {} intents from {}",
        file.intents.len(),
        path.display()
    );
    Ok(file.intents)
}
