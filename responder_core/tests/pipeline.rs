//! End-to-end tests of the reply pipeline with file-backed tasks

use responder_core::intents::{builtin_intents, FALLBACK_RESPONSES};
use responder_core::{
    Config, DictionaryLookup, JsonFileBackend, Responder, StaticDictionary, TaskStatus, TaskStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Dictionary that counts how often it is consulted
#[derive(Default)]
struct CountingDictionary {
    calls: Arc<AtomicUsize>,
}

impl DictionaryLookup for CountingDictionary {
    fn lookup(&self, _word: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }
}

fn responder_with_file(path: &std::path::Path) -> Responder {
    let tasks = TaskStore::open(Box::new(JsonFileBackend::new(path))).unwrap();
    Responder::new(builtin_intents(), Box::new(StaticDictionary::new()), tasks).unwrap()
}

#[test]
fn test_tasks_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    {
        let r = responder_with_file(&path);
        assert_eq!(r.get_response("add task Buy milk").unwrap(), "Task added: buy milk");
        assert_eq!(r.get_response("add task pay rent").unwrap(), "Task added: pay rent");
        assert_eq!(r.get_response("mark done 2").unwrap(), "Marked done: pay rent");
    }

    let r = responder_with_file(&path);
    assert_eq!(
        r.get_response("show tasks").unwrap(),
        "1. [Pending] buy milk\n2. [Done] pay rent"
    );
    let done = r.tasks().get_tasks(Some(TaskStatus::Done)).unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].title, "pay rent");
}

#[test]
fn test_stages_short_circuit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dictionary = CountingDictionary {
        calls: Arc::clone(&calls),
    };
    let r = Responder::new(builtin_intents(), Box::new(dictionary), TaskStore::in_memory()).unwrap();

    // greeting wins before the dictionary detector would see "define"
    let reply = r.get_response("hi, define umbrella").unwrap();
    assert!(!reply.starts_with("Sorry"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(
        r.get_response("define umbrella").unwrap(),
        "Sorry, I couldn't find the meaning of 'umbrella'."
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // calculator never reaches the dictionary
    assert_eq!(r.get_response("what is 5+7").unwrap(), "The result is: 12");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fallback_for_gibberish() {
    let r = Responder::new(
        builtin_intents(),
        Box::new(StaticDictionary::new()),
        TaskStore::in_memory(),
    )
    .unwrap();

    for message in ["xyzzy qwrtp", "zzzzzz", "qqq www"] {
        let reply = r.get_response(message).unwrap();
        assert!(
            FALLBACK_RESPONSES.contains(&reply.as_str()),
            "unexpected reply for '{}': {}",
            message,
            reply
        );
    }
}

#[test]
fn test_from_config_with_custom_intents() {
    let dir = tempfile::tempdir().unwrap();
    let intents_path = dir.path().join("intents.toml");
    std::fs::write(
        &intents_path,
        r#"
[[intents]]
name = "weather"
patterns = ["weather", "is it raining"]
responses = ["I can't see outside, sorry!"]
"#,
    )
    .unwrap();

    let config = Config::from_toml(&format!(
        r#"
intents_file = "{}"

[tasks]
path = "{}"

[dictionary]
enabled = false
"#,
        intents_path.display(),
        dir.path().join("tasks.json").display()
    ))
    .unwrap();

    let r = Responder::from_config(&config).unwrap();
    assert_eq!(
        r.get_response("How is the WEATHER today?").unwrap(),
        "I can't see outside, sorry!"
    );
    assert_eq!(
        r.get_response("whether").unwrap(),
        "(Did you mean **weather**?)\nI can't see outside, sorry!"
    );
    // built-in greetings are gone with a custom table
    assert!(FALLBACK_RESPONSES.contains(&r.get_response("hello").unwrap().as_str()));
}
