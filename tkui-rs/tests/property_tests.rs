use std::collections::HashSet;
use std::rc::Rc;

use proptest::prelude::*;
use tkui::tcl::{parse_bool, quote, split_commands};
use tkui::widgets::{Button, Frame};
use tkui::{HeadlessInterp, Interp, Options, Value, Widget, Window};

proptest! {
    /// A quoted value always comes back as exactly one word, unchanged.
    #[test]
    fn quote_is_injection_safe(s in "\\PC*") {
        let script = format!("set x {}", quote(&s));
        let commands = split_commands(&script).unwrap();
        prop_assert_eq!(commands.len(), 1);
        prop_assert_eq!(&commands[0], &vec!["set".to_owned(), "x".to_owned(), s]);
    }
}

proptest! {
    /// Same property through a full interpreter round-trip, including
    /// control characters.
    #[test]
    fn titles_survive_quoting(s in "[ -~\\t\\n]{0,40}") {
        let interp = Rc::new(HeadlessInterp::new());
        let window = Window::new(interp.clone(), &s).unwrap();
        prop_assert_eq!(window.title(), s.clone());
        let forwarded = interp.widget(".").unwrap().wm.get("title").cloned().unwrap_or_default();
        prop_assert_eq!(forwarded, s);
    }
}

proptest! {
    /// Paths never collide, however widgets are nested.
    #[test]
    fn paths_unique(layout in prop::collection::vec(0usize..3, 1..30)) {
        let interp = Rc::new(HeadlessInterp::new());
        let window = Window::new(interp, "").unwrap();
        let mut frames: Vec<Frame> = Vec::new();
        let mut buttons: Vec<Button> = Vec::new();
        let mut seen = HashSet::new();
        for choice in layout {
            let path = match (choice, frames.last().cloned()) {
                (0, _) | (_, None) => {
                    let f = Frame::new(&window).unwrap();
                    let p = f.path().to_owned();
                    frames.push(f);
                    p
                }
                (1, Some(parent)) => {
                    let f = Frame::new(&parent).unwrap();
                    let p = f.path().to_owned();
                    frames.push(f);
                    p
                }
                (_, Some(parent)) => {
                    let b = Button::new(&parent, "b").unwrap();
                    let p = b.path().to_owned();
                    buttons.push(b);
                    p
                }
            };
            prop_assert!(seen.insert(path));
        }
    }
}

proptest! {
    /// `set` then `get` returns the value iff the name was declared.
    #[test]
    fn options_set_get(name in "[a-z]{1,8}", value in "\\PC{0,16}") {
        let mut opts = Options::declare_keys(["text", "width", "state"]);
        let declared = opts.has(&name);
        prop_assert_eq!(opts.set(&name, value.as_str()), declared);
        if declared {
            prop_assert_eq!(opts.get(&name), Some(&Value::from(value.as_str())));
        } else {
            prop_assert_eq!(opts.get(&name), None);
        }
    }
}

proptest! {
    /// Any non-zero integer is true, zero is false.
    #[test]
    fn numeric_booleans(n in any::<i32>()) {
        prop_assert_eq!(parse_bool(&n.to_string()), Some(n != 0));
    }
}

#[test]
fn interp_error_messages_are_tcl_like() {
    let interp = HeadlessInterp::new();
    let err = interp.get_var("missing").unwrap_err();
    assert_eq!(err.to_string(), "can't read \"missing\": no such variable");
}
