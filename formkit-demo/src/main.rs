//! Drives a declarative signup form through a scripted session and prints
//! what a host would see: the event stream and the submitted record.
//!
//! Usage: `formkit-demo [form.json]`

mod paths;

use std::error::Error;
use std::fs::{self, File};
use std::time::Duration;

use formkit::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

const DEFAULT_FORM: &str = include_str!("../forms/signup.json");

fn init_logging() {
    let path = paths::log_file();
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && fs::create_dir_all(dir).is_err()
    {
        return;
    }
    if let Ok(file) = File::create(&path) {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
    }
}

fn report(cx: &Scope) {
    for event in cx.drain_events() {
        log::info!("{} <- {} {:?}", event.widget_id, event.kind.name(), event.detail);
        println!("  {:<16} {}", event.kind.name(), event.widget_id);
    }
}

fn type_keys(widget: &impl WidgetEvents, text: &str, cx: &Scope) {
    for c in text.chars() {
        widget.on_key(&KeyCombo::key(Key::Char(c)), cx);
    }
}

/// Pretend to fetch children from a slow backend.
async fn fetch_children(id: String) -> Result<Vec<TreeNode>, String> {
    tokio::time::sleep(Duration::from_millis(50)).await;
    match id.as_str() {
        "lang" => Ok(vec![
            TreeNode::new("rust", "Rust"),
            TreeNode::new("go", "Go"),
            TreeNode::new("zig", "Zig"),
        ]),
        other => Err(format!("no children for {}", other)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let source = match std::env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_FORM.to_string(),
    };

    let cx = Scope::new();
    let built = Builder::new(cx.clone()).from_json(&source)?;
    log::info!("built form {}", built.form.id());

    println!("email:");
    if let Some(email) = built.input("email") {
        type_keys(email, "ada@", &cx);
        println!("  valid={:?} error={:?}", email.is_valid(), email.error());
        type_keys(email, "example.com", &cx);
        println!("  valid={:?}", email.is_valid());
    }
    report(&cx);

    println!("nickname:");
    if let Some(nickname) = built.input("nickname") {
        nickname.input("Ada", &cx);
        println!("  valid={:?} error={:?}", nickname.is_valid(), nickname.error());
        nickname.input("ada_l", &cx);
        println!("  valid={:?}", nickname.is_valid());
    }
    report(&cx);

    println!("plan:");
    if let Some(free) = built.radios("plan").first() {
        free.on_key(&KeyCombo::key(Key::Down), &cx);
    }
    report(&cx);

    println!("city:");
    if let Some(city) = built.autocomplete("city") {
        city.on_focus(&cx);
        type_keys(city, "be", &cx);
        let candidates: Vec<String> = city.filtered_options().into_iter().map(|o| o.label).collect();
        println!("  candidates={:?}", candidates);
        city.on_key(&KeyCombo::key(Key::Down), &cx);
        city.on_key(&KeyCombo::key(Key::Down), &cx);
        city.on_key(&KeyCombo::key(Key::Enter), &cx);
        println!("  value={:?} search={:?}", city.value(), city.search());
    }
    report(&cx);

    println!("topics:");
    if let Some(topics) = built.tree("topics") {
        if let Some(request) = topics.toggle_expand("lang", &cx)
            && let Some(task) = topics.spawn_load(request, fetch_children)
        {
            task.await??;
        }
        topics.select("rust", &cx);
        topics.select("cargo", &cx);
        for node in topics.visible() {
            println!("  {}{}", "  ".repeat(node.depth), node.label);
        }
    }
    report(&cx);

    println!("agree:");
    if let Some(agree) = built.checkbox("agree") {
        agree.on_click(ClickTarget::HitArea, &cx);
    }
    report(&cx);

    println!("submit:");
    if let Some(submit) = built.button("Sign up") {
        built.form.activate(submit, &cx);
    }
    for event in cx.drain_events() {
        if let EventDetail::Data(data) = &event.detail {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
    }

    if let Some(toast) = built.toast("welcome") {
        toast.open(&cx);
        tokio::time::sleep(Duration::from_millis(400)).await;
        println!("toast open after timeout: {}", toast.is_open());
    }
    report(&cx);

    Ok(())
}
