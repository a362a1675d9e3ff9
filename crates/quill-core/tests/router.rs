use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context as _;
use rstest::rstest;

use quill_core::{
    ChatRouter, ChatSink, CommandError, CommandNode, CommandSet, Diagnostics, Handled, SetupError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Message(String),
    Mistake(String),
    Internal(String),
    Clear,
}

#[derive(Debug, Default)]
struct Host {
    calls: Vec<Call>,
    echoed: Vec<String>,
    god_mode: bool,
}

impl Host {
    fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Message(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ChatSink for Host {
    fn accept_message(&mut self, text: &str) {
        self.calls.push(Call::Message(text.to_string()));
    }

    fn report_user_mistake(&mut self, text: &str) {
        self.calls.push(Call::Mistake(text.to_string()));
    }

    fn report_internal_error(&mut self, summary: &str) {
        self.calls.push(Call::Internal(summary.to_string()));
    }

    fn clear_log(&mut self) {
        self.calls.push(Call::Clear);
    }
}

#[derive(Clone, Default)]
struct SharedDiagnostics(Rc<RefCell<Vec<String>>>);

impl Diagnostics for SharedDiagnostics {
    fn record(&mut self, error: &anyhow::Error) {
        self.0.borrow_mut().push(format!("{error:#}"));
    }
}

fn chat_group() -> CommandNode<Host> {
    CommandNode::group(
        "chat",
        "Commands for the chat itself.",
        [
            CommandNode::<Host>::leaf("echo", "Sends the argument back.", |cx, arg| {
                cx.host().echoed.push(arg.to_string());
                cx.reply(arg);
                Ok(())
            }),
            CommandNode::<Host>::leaf(
                "clear",
                "Clears the chat (returns an error if there is nothing to clear).",
                |cx, _| {
                    cx.host().clear_log();
                    Ok(())
                },
            ),
            CommandNode::leaf("where", "Prints this command's full name.", |cx, _| {
                let name = cx.path().to_string();
                cx.reply(&name);
                Ok(())
            }),
        ],
    )
    .expect("unique chat commands")
}

fn game_group() -> CommandNode<Host> {
    CommandNode::group(
        "game",
        "Commands acting on the world.",
        [
            CommandNode::<Host>::leaf("god_mode", "Toggles god mode.", |cx, _| {
                let host = cx.host();
                host.god_mode = !host.god_mode;
                Ok(())
            }),
            CommandNode::leaf("tp", "Teleports the player.", |_, arg| {
                let coords: Vec<&str> = arg.split_whitespace().collect();
                if coords.len() != 2 {
                    return Err(CommandError::invalid(
                        "Please provide both x and y coordinates",
                    ));
                }
                Ok(())
            }),
            CommandNode::leaf("crash", "Always fails.", |_, arg| {
                let n: i32 = arg.trim().parse().context("parsing crash count")?;
                Err(anyhow::anyhow!("crashed {n} times").into())
            }),
            CommandNode::leaf("split", "Divides 100 by its argument.", |cx, arg| {
                let parts: i32 = arg
                    .trim()
                    .parse()
                    .map_err(|_| CommandError::invalid("Not a number"))?;
                cx.reply(&(100 / parts).to_string());
                Ok(())
            }),
        ],
    )
    .expect("unique game commands")
}

fn router_with(diagnostics: SharedDiagnostics) -> ChatRouter<Host> {
    ChatRouter::builder("/")
        .command(chat_group())
        .command(game_group())
        .diagnostics(diagnostics)
        .build()
        .expect("valid command tree")
}

fn router() -> ChatRouter<Host> {
    router_with(SharedDiagnostics::default())
}

#[test]
fn duplicate_registration_fails_and_keeps_the_set() {
    let mut set = CommandSet::prefixed("/");
    set.register(chat_group()).expect("first chat");
    let err = set.register(chat_group()).expect_err("second chat");
    assert_eq!(
        err,
        SetupError::DuplicateRegistration {
            name: "chat".to_string()
        }
    );
    assert_eq!(set.len(), 1);
    assert_eq!(set.tree().len(), 1);
}

#[rstest]
#[case("")]
#[case("/")]
#[case(" /chat")]
#[case("/ ")]
#[case("/chat")]
#[case("/chat  echo")]
#[case("/chat echo help me")]
#[case("/chat nope nope nope")]
#[case("/game tp 1")]
#[case("/game crash x")]
#[case("/game crash 3")]
#[case("/game split 0")]
#[case("/// /// ///")]
#[case("/ünïcödé ☃")]
fn every_line_gets_exactly_one_outcome(#[case] line: &str) {
    let mut router = router();
    let mut host = Host::default();
    let handled = router.receive_line(line, &mut host);

    let reports = host
        .calls
        .iter()
        .filter(|call| matches!(call, Call::Mistake(_) | Call::Internal(_)))
        .count();
    match handled {
        Handled::Forwarded => assert_eq!(host.calls, vec![Call::Message(line.to_string())]),
        Handled::Executed => assert_eq!(reports, 0),
        Handled::UserMistake | Handled::InternalError => {
            assert_eq!(reports, 1);
            assert_eq!(host.calls.len(), 1);
        }
    }
}

#[test]
fn echo_receives_the_rest_of_the_line_verbatim() {
    let mut router = router();
    let mut host = Host::default();
    assert_eq!(
        router.receive_line("/chat echo hi there", &mut host),
        Handled::Executed
    );
    assert_eq!(host.echoed, vec!["hi there".to_string()]);
    assert_eq!(host.messages(), vec!["hi there"]);
}

#[test]
fn group_help_and_bare_group_are_identical() {
    let mut router = router();
    let mut with_help = Host::default();
    let mut bare = Host::default();
    router.receive_line("/chat help", &mut with_help);
    router.receive_line("/chat", &mut bare);

    assert_eq!(with_help.calls, bare.calls);
    assert_eq!(
        bare.messages(),
        vec![
            "/chat: Commands for the chat itself.\n\n\
             Available subcommands:\n\
             - echo: Sends the argument back.\n\
             - clear: Clears the chat (returns an error if there is nothing to clear).\n\
             - where: Prints this command's full name."
        ]
    );
}

#[test]
fn empty_subcommand_name_shows_group_help() {
    let mut router = router();
    let mut double_space = Host::default();
    let mut bare = Host::default();
    router.receive_line("/chat  echo", &mut double_space);
    router.receive_line("/chat", &mut bare);
    assert_eq!(double_space.calls, bare.calls);
    assert!(double_space.echoed.is_empty());
}

#[test]
fn leaf_help_is_reserved() {
    let mut router = router();
    let mut host = Host::default();
    router.receive_line("/chat clear help", &mut host);
    assert_eq!(
        host.messages(),
        vec!["/chat clear: Clears the chat (returns an error if there is nothing to clear)."]
    );
    assert!(!host.calls.contains(&Call::Clear));
}

#[test]
fn unknown_command_is_a_user_mistake() {
    let mut router = router();
    let mut host = Host::default();
    assert_eq!(
        router.receive_line("/unknown_token", &mut host),
        Handled::UserMistake
    );
    assert_eq!(
        host.calls,
        vec![Call::Mistake("Unknown command: unknown_token".to_string())]
    );
}

#[test]
fn unknown_subcommand_names_the_subcommand() {
    let mut router = router();
    let mut host = Host::default();
    router.receive_line("/chat shout loudly", &mut host);
    assert_eq!(
        host.calls,
        vec![Call::Mistake("Unknown command: shout".to_string())]
    );
}

#[test]
fn plain_text_is_forwarded_verbatim() {
    let mut router = router();
    let mut host = Host::default();
    assert_eq!(
        router.receive_line("hello world", &mut host),
        Handled::Forwarded
    );
    assert_eq!(host.calls, vec![Call::Message("hello world".to_string())]);
    assert!(host.echoed.is_empty());
}

#[test]
fn invalid_arguments_are_user_mistakes() {
    let mut router = router();
    let mut host = Host::default();
    assert_eq!(
        router.receive_line("/game tp 4", &mut host),
        Handled::UserMistake
    );
    assert_eq!(
        host.calls,
        vec![Call::Mistake(
            "Please provide both x and y coordinates".to_string()
        )]
    );
}

#[test]
fn internal_errors_hide_detail_from_the_player() {
    let diagnostics = SharedDiagnostics::default();
    let mut router = router_with(diagnostics.clone());
    let mut host = Host::default();

    assert_eq!(
        router.receive_line("/game crash nine", &mut host),
        Handled::InternalError
    );
    assert_eq!(
        host.calls,
        vec![Call::Internal("An unexpected error occurred.".to_string())]
    );
    let recorded = diagnostics.0.borrow();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].starts_with("parsing crash count"));

    drop(recorded);
    router.receive_line("/game crash 2", &mut host);
    assert_eq!(diagnostics.0.borrow()[1], "crashed 2 times");
}

#[test]
fn panicking_command_is_an_internal_error() {
    let diagnostics = SharedDiagnostics::default();
    let mut router = router_with(diagnostics.clone());
    let mut host = Host::default();

    assert_eq!(
        router.receive_line("/game split 0", &mut host),
        Handled::InternalError
    );
    assert_eq!(
        host.calls,
        vec![Call::Internal("An unexpected error occurred.".to_string())]
    );
    assert!(diagnostics.0.borrow()[0].contains("divide by zero"));

    // The router keeps working afterwards.
    let mut host = Host::default();
    assert_eq!(router.receive_line("/game split 4", &mut host), Handled::Executed);
    assert_eq!(host.messages(), vec!["25"]);
}

#[test]
fn leaf_state_persists_between_lines() {
    let mut router = router();
    let mut host = Host::default();
    router.receive_line("/game god_mode", &mut host);
    assert!(host.god_mode);
    router.receive_line("/game god_mode", &mut host);
    assert!(!host.god_mode);
}

#[rstest]
#[case("/ch", &["chat"])]
#[case("/", &["chat", "game"])]
#[case("/chat ec", &["echo"])]
#[case("/chat ", &["echo", "clear", "where"])]
#[case("/game god", &["god_mode"])]
#[case("/chat echo hi", &[])]
#[case("/zzz", &[])]
#[case("chat", &[])]
#[case("", &[])]
fn completion_follows_the_tree(#[case] text: &str, #[case] expected: &[&str]) {
    assert_eq!(router().complete(text), expected);
}

#[test]
fn completion_and_dispatch_agree_on_word_boundaries() {
    let mut router = router();
    for suggestion in router.complete("/chat ec") {
        let mut host = Host::default();
        let line = format!("/chat {suggestion} x");
        assert_eq!(router.receive_line(&line, &mut host), Handled::Executed);
    }
}

#[test]
fn full_path_is_reconstructed() {
    let mut router = router();
    assert_eq!(router.full_name("chat echo").as_deref(), Some("/chat echo"));
    assert_eq!(router.full_name("game").as_deref(), Some("/game"));

    let mut host = Host::default();
    router.receive_line("/chat where", &mut host);
    assert_eq!(host.messages(), vec!["/chat where"]);
}

#[test]
fn help_tree_is_nested() {
    let tree = router().help_tree();
    assert_eq!(
        tree.to_json(),
        serde_json::json!({
            "chat": {"echo": {}, "clear": {}, "where": {}},
            "game": {"god_mode": {}, "tp": {}, "crash": {}, "split": {}}
        })
    );
    let chat = tree.get("chat").expect("chat group");
    assert!(chat.get("echo").expect("echo leaf").is_empty());
}
