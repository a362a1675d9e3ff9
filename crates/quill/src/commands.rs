use anyhow::Context as _;
use quill_core::{
    Action, ChatConfig, ChatRouter, ChatSink, CommandError, CommandNode, Context, SetupError,
};

use crate::session::Session;
use crate::world::{SpawnError, SPAWNABLE};

type Node = CommandNode<Session>;

/// Builds the router with every built-in command.
pub fn build_router(config: &ChatConfig) -> Result<ChatRouter<Session>, SetupError> {
    ChatRouter::builder(config.command_prefix.as_str())
        .command(chat_commands()?)
        .command(game_commands()?)
        .command(debug_commands()?)
        .command(Node::leaf("quit", "Closes the console.", |cx, _| {
            cx.reply("Goodbye.");
            cx.host().should_quit = true;
            Ok(())
        }))
        .build()
}

fn chat_commands() -> Result<Node, SetupError> {
    Node::group(
        "chat",
        "Commands for the chat log.",
        [
            Node::leaf("echo", "Repeats its argument in the chat.", |cx, arg| {
                cx.reply(arg);
                Ok(())
            }),
            Node::leaf(
                "clear",
                "Clears the chat (returns an error if there is nothing to clear).",
                |cx, _| {
                    if cx.host().history.is_empty() {
                        return Err(CommandError::invalid("There are no messages to clear"));
                    }
                    cx.host().clear_log();
                    Ok(())
                },
            ),
            Node::leaf("undo", "Removes the last message from the chat.", |cx, _| {
                if !cx.host().history.clear_last() {
                    return Err(CommandError::invalid("There are no messages to remove"));
                }
                Ok(())
            }),
        ],
    )
}

fn game_commands() -> Result<Node, SetupError> {
    Node::group(
        "game",
        "Commands acting on the world.",
        [
            Node::action("god_mode", "Toggles invulnerability.", GodMode::default()),
            Node::leaf(
                "tp",
                "Teleports the player to a tile.\nUsage: tp <x> <y>",
                teleport,
            ),
            Node::leaf(
                "summon",
                "Summons a creature on a tile.\nUsage: summon <entity> <x> <y>",
                summon,
            ),
        ],
    )
}

fn debug_commands() -> Result<Node, SetupError> {
    Node::group(
        "debug",
        "Introspection of the command system.",
        [
            Node::leaf("full_name", "Prints this command's full name.", |cx, _| {
                let name = cx.path().to_string();
                cx.reply(&name);
                Ok(())
            }),
            Node::leaf("full_tree", "Prints the whole command tree as JSON.", |cx, _| {
                let json = serde_json::to_string_pretty(cx.tree())
                    .context("Failed to serialize the command tree")?;
                cx.reply(&json);
                Ok(())
            }),
            Node::leaf("error", "Fails on purpose.", |cx, _| {
                Err(anyhow::anyhow!("deliberate failure requested through {}", cx.path()).into())
            }),
        ],
    )
}

/// Toggle kept by the command itself; mirrored onto the player for display.
#[derive(Debug, Default)]
struct GodMode {
    active: bool,
}

impl Action<Session> for GodMode {
    fn run(&mut self, cx: &mut Context<'_, Session>, _argument: &str) -> Result<(), CommandError> {
        self.active = !self.active;
        cx.host().world.player.god_mode = self.active;
        cx.reply(if self.active {
            "God mode activated"
        } else {
            "God mode deactivated"
        });
        Ok(())
    }

    fn on_load(&mut self) {
        self.active = false;
    }
}

fn teleport(cx: &mut Context<'_, Session>, argument: &str) -> Result<(), CommandError> {
    let words: Vec<&str> = argument.split_whitespace().collect();
    let [x, y] = words[..] else {
        return Err(CommandError::invalid("Please provide both x and y coordinates"));
    };
    let (x, y) = (parse_coordinate(x)?, parse_coordinate(y)?);

    if cx.host().world.teleport(x, y).is_none() {
        return Err(CommandError::invalid("Those coordinates are outside the world"));
    }
    cx.reply(&format!("Teleported to ({x}, {y})."));
    Ok(())
}

fn summon(cx: &mut Context<'_, Session>, argument: &str) -> Result<(), CommandError> {
    let words: Vec<&str> = argument.split_whitespace().collect();
    let [entity, x, y] = words[..] else {
        return Err(CommandError::invalid(
            "Please provide an entity name and both x and y coordinates",
        ));
    };
    let (x, y) = (parse_coordinate(x)?, parse_coordinate(y)?);

    match cx.host().world.spawn_entity(entity, x, y) {
        Ok(_) => {}
        Err(SpawnError::UnknownKind) => {
            return Err(CommandError::invalid(format!(
                "Cannot summon {entity} (known entities: {})",
                SPAWNABLE.join(", ")
            )));
        }
        Err(SpawnError::OutOfBounds) => {
            return Err(CommandError::invalid("Those coordinates are outside the world"));
        }
    }
    cx.reply(&format!("Summoned {entity} at ({x}, {y})."));
    Ok(())
}

fn parse_coordinate(text: &str) -> Result<i32, CommandError> {
    text.parse()
        .map_err(|_| CommandError::invalid("Invalid coordinates"))
}
