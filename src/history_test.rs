use super::*;

// =============================================================
// Helpers
// =============================================================

fn chat(n: usize) -> LogEntry {
    LogEntry::Chat {
        sender: format!("p{n}"),
        chat_type: ChatType::Local,
        message: format!("m{n}"),
        timestamp: "12:00".to_owned(),
    }
}

fn system(text: &str) -> LogEntry {
    LogEntry::System { message: text.to_owned() }
}

fn messages(log: &MessageLog) -> Vec<String> {
    log.iter().map(|e| e.message().to_owned()).collect()
}

// =============================================================
// Bound
// =============================================================

#[test]
fn new_log_is_empty() {
    let log = MessageLog::new(100, EvictionPolicy::PinFirst);
    assert!(log.is_empty());
    assert_eq!(log.capacity(), 100);
}

#[test]
fn zero_capacity_is_one() {
    let mut log = MessageLog::new(0, EvictionPolicy::Fifo);
    assert_eq!(log.capacity(), 1);
    log.push(chat(1));
    log.push(chat(2));
    assert_eq!(messages(&log), vec!["m2"]);
}

#[test]
fn push_below_bound_evicts_nothing() {
    let mut log = MessageLog::new(3, EvictionPolicy::PinFirst);
    assert_eq!(log.push(chat(1)), None);
    assert_eq!(log.push(chat(2)), None);
    assert_eq!(log.push(chat(3)), None);
    assert_eq!(log.len(), 3);
}

#[test]
fn never_exceeds_bound_for_any_policy() {
    for policy in [EvictionPolicy::PinFirst, EvictionPolicy::PinBanner, EvictionPolicy::Fifo] {
        let mut log = MessageLog::new(100, policy);
        for n in 0..350 {
            if n % 7 == 0 {
                log.push(system("notice"));
            } else {
                log.push(chat(n));
            }
            assert!(log.len() <= 100, "{policy:?} exceeded bound at {n}");
        }
        assert_eq!(log.len(), 100);
    }
}

// =============================================================
// Policies
// =============================================================

#[test]
fn pin_first_keeps_banner_and_drops_second() {
    let mut log = MessageLog::new(3, EvictionPolicy::PinFirst);
    log.push(system("welcome"));
    log.push(chat(1));
    log.push(chat(2));
    assert_eq!(log.push(chat(3)), Some(1));
    assert_eq!(messages(&log), vec!["welcome", "m2", "m3"]);
}

#[test]
fn pin_first_pins_even_a_chat_message() {
    let mut log = MessageLog::new(3, EvictionPolicy::PinFirst);
    for n in 1..=5 {
        log.push(chat(n));
    }
    assert_eq!(messages(&log), vec!["m1", "m4", "m5"]);
}

#[test]
fn pin_banner_is_fifo_when_first_is_chat() {
    let mut log = MessageLog::new(3, EvictionPolicy::PinBanner);
    for n in 1..=5 {
        log.push(chat(n));
    }
    assert_eq!(messages(&log), vec!["m3", "m4", "m5"]);
}

#[test]
fn pin_banner_keeps_leading_system_notice() {
    let mut log = MessageLog::new(3, EvictionPolicy::PinBanner);
    log.push(system("welcome"));
    for n in 1..=4 {
        log.push(chat(n));
    }
    assert_eq!(messages(&log), vec!["welcome", "m3", "m4"]);
}

#[test]
fn fifo_drops_oldest() {
    let mut log = MessageLog::new(2, EvictionPolicy::Fifo);
    log.push(system("welcome"));
    log.push(chat(1));
    assert_eq!(log.push(chat(2)), Some(0));
    assert_eq!(messages(&log), vec!["m1", "m2"]);
}

#[test]
fn pin_first_with_capacity_one_keeps_newest() {
    let mut log = MessageLog::new(1, EvictionPolicy::PinFirst);
    log.push(system("welcome"));
    assert_eq!(log.push(chat(1)), Some(0));
    assert_eq!(messages(&log), vec!["m1"]);
}

// =============================================================
// Accessors
// =============================================================

#[test]
fn clear_empties_log() {
    let mut log = MessageLog::new(5, EvictionPolicy::PinFirst);
    log.push(chat(1));
    log.clear();
    assert!(log.is_empty());
    assert!(log.last().is_none());
}

#[test]
fn get_and_last_index_in_order() {
    let mut log = MessageLog::new(5, EvictionPolicy::PinFirst);
    log.push(system("a"));
    log.push(chat(1));
    assert!(log.get(0).is_some_and(LogEntry::is_system));
    assert_eq!(log.last().map(LogEntry::message), Some("m1"));
}
