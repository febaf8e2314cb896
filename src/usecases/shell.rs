//! Interactive line shell over the sync engine. Each prompt cycle first
//! applies the wall-clock ticks that passed while the user was idle, so the
//! poll cadence holds without a background thread.

use std::io;

use crate::{
    api::ApiError,
    domain::{
        chat::ChatSummary,
        identity::Session,
        message::Message,
    },
    usecases::{
        clock::TickClock,
        profile::{ProfileApi, ProfileController, ProfileUpdate},
        sign_in::LineTerminal,
        sync_engine::{ChatSyncEngine, SendError, SyncApi},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellOutcome {
    Quit,
    LogoutRequested,
    /// The server rejected the token mid-session; the caller clears the
    /// stored credential.
    SessionExpired,
}

pub fn run_shell(
    terminal: &mut dyn LineTerminal,
    sync_api: &dyn SyncApi,
    profile_api: &dyn ProfileApi,
    clock: &mut dyn TickClock,
    engine: &mut ChatSyncEngine,
    session: &mut Session,
) -> io::Result<ShellOutcome> {
    terminal.print_line(&format!(
        "Signed in as {}. Type 'help' for commands.",
        session.identity.display_name
    ))?;

    engine.start(sync_api);
    if report_engine_error(terminal, engine)? {
        return Ok(ShellOutcome::SessionExpired);
    }
    print_chats(terminal, engine)?;

    loop {
        engine.advance(sync_api, clock.ticks_elapsed());
        if report_engine_error(terminal, engine)? {
            return Ok(ShellOutcome::SessionExpired);
        }

        let Some(line) = terminal.prompt_line("> ")? else {
            return Ok(ShellOutcome::Quit);
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(' ') {
            Some((head, tail)) => (head, tail.trim()),
            None => (line, ""),
        };

        match command {
            "help" => print_help(terminal)?,
            "quit" | "exit" => return Ok(ShellOutcome::Quit),
            "logout" => return Ok(ShellOutcome::LogoutRequested),
            "chats" => print_chats(terminal, engine)?,
            "contacts" => print_contacts(terminal, engine)?,
            "messages" => print_messages(terminal, engine)?,
            "open" => open_chat(terminal, sync_api, engine, rest)?,
            "start" => {
                if !start_chat(terminal, sync_api, engine, rest)? {
                    return Ok(ShellOutcome::SessionExpired);
                }
            }
            "close" => {
                engine.close_conversation();
                terminal.print_line("Conversation closed.")?;
            }
            "profile" => profile_command(terminal, profile_api, session, rest)?,
            "avatar" => avatar_command(terminal, profile_api, session, rest)?,
            _ => {
                if !send_text(terminal, sync_api, engine, line)? {
                    return Ok(ShellOutcome::SessionExpired);
                }
            }
        }
    }
}

/// Prints a pending engine error. Returns true when the error means the
/// session is gone.
fn report_engine_error(
    terminal: &mut dyn LineTerminal,
    engine: &mut ChatSyncEngine,
) -> io::Result<bool> {
    let Some(err) = engine.take_last_error() else {
        return Ok(false);
    };

    terminal.print_line(&err.user_message())?;
    Ok(err == ApiError::Unauthenticated)
}

fn print_help(terminal: &mut dyn LineTerminal) -> io::Result<()> {
    for line in [
        "chats                     list chats",
        "contacts                  list contacts",
        "open <n>                  open chat number n",
        "start <n>                 start a chat with contact number n",
        "messages                  show the open conversation",
        "close                     close the open conversation",
        "profile                   show your profile",
        "profile name <value>      change display name (first and last)",
        "profile position <value>  change position",
        "profile department <value> change department",
        "avatar <path>             upload a new avatar image",
        "logout                    sign out and remove the stored session",
        "quit                      leave without signing out",
        "anything else             send as a message to the open chat",
    ] {
        terminal.print_line(line)?;
    }
    Ok(())
}

fn print_chats(terminal: &mut dyn LineTerminal, engine: &ChatSyncEngine) -> io::Result<()> {
    let chats = engine.chat_list().chats();
    if chats.is_empty() {
        terminal.print_line("No chats yet. Use 'contacts' and 'start <n>'.")?;
        return Ok(());
    }

    for (index, chat) in chats.iter().enumerate() {
        terminal.print_line(&format_chat_row(index + 1, chat))?;
    }
    Ok(())
}

fn format_chat_row(number: usize, chat: &ChatSummary) -> String {
    let unread = if chat.unread_count > 0 {
        format!(" [{}]", chat.unread_count)
    } else {
        String::new()
    };
    let presence = match chat.online {
        Some(true) => " *",
        _ => "",
    };
    format!(
        "{number:>3}. {}{presence}{unread}  {} {}",
        chat.name, chat.last_time, chat.last_message_preview
    )
}

fn print_contacts(terminal: &mut dyn LineTerminal, engine: &ChatSyncEngine) -> io::Result<()> {
    if engine.contacts().is_empty() {
        terminal.print_line("No contacts available.")?;
        return Ok(());
    }

    for (index, contact) in engine.contacts().iter().enumerate() {
        let position = contact.position.as_deref().unwrap_or("—");
        terminal.print_line(&format!(
            "{:>3}. {}  {position}",
            index + 1,
            contact.display_name
        ))?;
    }
    Ok(())
}

fn print_messages(terminal: &mut dyn LineTerminal, engine: &ChatSyncEngine) -> io::Result<()> {
    if engine.conversation().chat_id().is_none() {
        terminal.print_line("No open conversation. Use 'open <n>'.")?;
        return Ok(());
    }

    for message in engine.conversation().messages() {
        terminal.print_line(&format_message_row(message))?;
    }
    Ok(())
}

fn format_message_row(message: &Message) -> String {
    let sender = if message.own {
        "you"
    } else {
        message.sender_name.as_str()
    };
    format!("{} {}: {}", message.time, sender, message.display_content())
}

fn open_chat(
    terminal: &mut dyn LineTerminal,
    sync_api: &dyn SyncApi,
    engine: &mut ChatSyncEngine,
    argument: &str,
) -> io::Result<()> {
    let Some(chat_id) = parse_index(argument)
        .and_then(|index| engine.chat_list().chats().get(index - 1))
        .map(|chat| chat.chat_id)
    else {
        terminal.print_line("Usage: open <chat number from 'chats'>.")?;
        return Ok(());
    };

    // A failed load surfaces through the engine error on the next cycle.
    engine.select_chat(sync_api, chat_id);
    print_messages(terminal, engine)
}

fn start_chat(
    terminal: &mut dyn LineTerminal,
    sync_api: &dyn SyncApi,
    engine: &mut ChatSyncEngine,
    argument: &str,
) -> io::Result<bool> {
    let Some(contact_id) = parse_index(argument)
        .and_then(|index| engine.contacts().get(index - 1))
        .map(|contact| contact.id)
    else {
        terminal.print_line("Usage: start <contact number from 'contacts'>.")?;
        return Ok(true);
    };

    match engine.start_chat_with(sync_api, contact_id) {
        Ok(_) => {
            print_messages(terminal, engine)?;
            Ok(true)
        }
        Err(err) => {
            terminal.print_line(&err.user_message())?;
            Ok(err != ApiError::Unauthenticated)
        }
    }
}

fn send_text(
    terminal: &mut dyn LineTerminal,
    sync_api: &dyn SyncApi,
    engine: &mut ChatSyncEngine,
    text: &str,
) -> io::Result<bool> {
    engine.set_draft(text);
    match engine.submit_draft(sync_api) {
        Ok(()) | Err(SendError::EmptyDraft) => Ok(true),
        Err(SendError::NoActiveChat) => {
            terminal.print_line("No open chat. Use 'open <n>' first, then type your message.")?;
            Ok(true)
        }
        Err(SendError::Api(err)) => {
            terminal.print_line(&format!("Message not sent: {}", err.user_message()))?;
            Ok(err != ApiError::Unauthenticated)
        }
    }
}

fn profile_command(
    terminal: &mut dyn LineTerminal,
    profile_api: &dyn ProfileApi,
    session: &mut Session,
    rest: &str,
) -> io::Result<()> {
    if rest.is_empty() {
        let identity = &session.identity;
        terminal.print_line(&format!(
            "{} ({}) — {} / {}",
            identity.display_name,
            identity.phone,
            identity.position.as_deref().unwrap_or("—"),
            identity.department.as_deref().unwrap_or("—"),
        ))?;
        return Ok(());
    }

    let (field, value) = match rest.split_once(' ') {
        Some((field, value)) => (field, value.trim()),
        None => {
            terminal.print_line("Usage: profile <name|position|department> <value>.")?;
            return Ok(());
        }
    };

    let mut update = ProfileUpdate::from_identity(&session.identity);
    match field {
        "name" => update.display_name = value.to_owned(),
        "position" => update.position = value.to_owned(),
        "department" => update.department = value.to_owned(),
        _ => {
            terminal.print_line("Usage: profile <name|position|department> <value>.")?;
            return Ok(());
        }
    }

    match ProfileController::save(profile_api, session, &update) {
        Ok(()) => terminal.print_line("Profile updated."),
        Err(err) => terminal.print_line(&err.to_string()),
    }
}

fn avatar_command(
    terminal: &mut dyn LineTerminal,
    profile_api: &dyn ProfileApi,
    session: &mut Session,
    path: &str,
) -> io::Result<()> {
    if path.is_empty() {
        terminal.print_line("Usage: avatar <path to image file>.")?;
        return Ok(());
    }

    let Some(content_type) = content_type_for(path) else {
        terminal.print_line("Avatar must be a .jpg, .png, .webp or .gif file.")?;
        return Ok(());
    };

    let image = match std::fs::read(path) {
        Ok(image) => image,
        Err(err) => {
            terminal.print_line(&format!("Cannot read {path}: {err}"))?;
            return Ok(());
        }
    };

    match ProfileController::set_avatar(profile_api, session, &image, content_type) {
        Ok(()) => terminal.print_line("Avatar updated."),
        Err(err) => terminal.print_line(&err.to_string()),
    }
}

fn content_type_for(path: &str) -> Option<&'static str> {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())?;
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn parse_index(argument: &str) -> Option<usize> {
    argument.parse::<usize>().ok().filter(|index| *index >= 1)
}
