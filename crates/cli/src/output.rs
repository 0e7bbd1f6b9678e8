//! CLI output formatting utilities.
//!
//! Colored status messages and the one-line renderings of requests, commands
//! and resources shared by every command.

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};

use pkisync_lib::model::AnyResource;
use pkisync_lib::policy::State;
use pkisync_lib::record::Command;
use pkisync_lib::request::{Method, Request};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const INFO: &str = "•";
  pub const ADD: &str = "+";
  pub const MODIFY: &str = "~";
  pub const REMOVE: &str = "-";
}

/// Symbol for a request: merges add, overwrites modify, deletes remove.
pub fn method_symbol(method: Method) -> &'static str {
  match method {
    Method::Patch => symbols::ADD,
    Method::Put => symbols::MODIFY,
    Method::Delete => symbols::REMOVE,
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Print requests in send order. With `verbose`, payloads follow each line.
pub fn print_requests(requests: &[Request], verbose: bool) -> anyhow::Result<()> {
  println!("Requests:");
  for request in requests {
    let symbol = method_symbol(request.method);
    let colored = match request.method {
      Method::Patch => symbol.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
      Method::Put => symbol.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string(),
      Method::Delete => symbol.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
    };
    println!("  {} {:<6} {}", colored, request.method.as_str(), request.path);

    if let (true, Some(data)) = (verbose, &request.data) {
      let payload = serde_json::to_string_pretty(data).context("Failed to serialize payload")?;
      for line in payload.lines() {
        println!("      {}", line.if_supports_color(Stream::Stdout, |s| s.dimmed()));
      }
    }
  }
  Ok(())
}

pub fn print_commands(commands: &[Command]) {
  println!("Commands:");
  for command in commands {
    println!(
      "  {} {} ({})",
      symbols::INFO,
      describe(&command.resource),
      state_label(command.state)
    );
  }
}

/// `collection/identity` for a resource.
pub fn describe(resource: &AnyResource) -> String {
  format!(
    "{}/{}",
    resource.collection(),
    resource.identity().unwrap_or("(unnamed)")
  )
}

fn state_label(state: State) -> String {
  state
    .as_str()
    .if_supports_color(Stream::Stdout, |s| s.dimmed())
    .to_string()
}
