//! Interactive terminal front end for the conversation controller.

mod command;
mod render;

use command::{Command, HELP};
use render::{print_message, StreamPrinter};

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::controller::{ConversationController, ReplyOutcome, SubmitError};

fn prompt(controller: &ConversationController) -> io::Result<()> {
    let mut out = io::stdout();
    match controller.attachment() {
        Some(image) => write!(out, "[{}] > ", image.mime_type)?,
        None => write!(out, "> ")?,
    }
    out.flush()
}

/// Read commands from stdin until `/quit`, end of input, or Ctrl-C at the
/// prompt.
pub async fn run(mut controller: ConversationController) -> parley_common::Result<()> {
    println!(
        "parley {} ({}). Type /help for commands.",
        env!("CARGO_PKG_VERSION"),
        controller.model_name()
    );
    let label = controller.variant().to_string();
    for message in controller.messages() {
        print_message(message, &label);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&controller)?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            println!();
            break;
        };

        match Command::parse(&line) {
            Command::Send(text) => send(&mut controller, &text).await,
            Command::Image(source) => match controller.select_image_source(&source).await {
                Ok(()) => {
                    if let Some(image) = controller.attachment() {
                        println!("attached {} ({} bytes)", image.mime_type, image.decoded_len());
                    }
                }
                Err(e) => println!("(!) {e}"),
            },
            Command::Detach => match controller.detach_image() {
                Some(_) => println!("attachment removed"),
                None => println!("no image attached"),
            },
            Command::Model(choice) => {
                let switched = match choice {
                    Some(variant) => controller.switch_model(variant).map(|()| variant),
                    None => controller.toggle_model(),
                };
                match switched {
                    Ok(variant) => println!("model: {} ({})", variant, controller.model_name()),
                    Err(e) => println!("(!) {e}"),
                }
            }
            Command::Clear => {
                controller.clear();
                let label = controller.variant().to_string();
                for message in controller.messages() {
                    print_message(message, &label);
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Invalid(message) => println!("(!) {message}"),
        }
    }
    Ok(())
}

async fn send(controller: &mut ConversationController, text: &str) {
    let pending = match controller.submit(text) {
        Ok(pending) => pending,
        Err(SubmitError::Empty) => return,
        Err(e) => {
            println!("(!) {e}");
            return;
        }
    };

    // Ctrl-C while streaming stops the reply instead of quitting
    let token = pending.cancel_handle();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let label = controller.variant().to_string();
    let placeholder = pending.placeholder_id().clone();
    let mut printer = StreamPrinter::stdout();
    if let Err(e) = printer.begin(&label) {
        debug!(error = %e, "failed to write reply header");
    }

    let outcome = controller
        .run_reply(pending, |message| {
            if let Err(e) = printer.update(&message.text) {
                debug!(error = %e, "failed to write reply text");
            }
        })
        .await;
    watcher.abort();

    if let Err(e) = printer.finish(controller.message(&placeholder)) {
        debug!(error = %e, "failed to finish reply line");
    }
    match outcome {
        ReplyOutcome::Stopped => println!("(stopped)"),
        ReplyOutcome::Failed(e) => debug!(error = %e, "reply failed"),
        ReplyOutcome::Completed | ReplyOutcome::Stale => {}
    }
}
