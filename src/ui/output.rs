use crate::destination::Destination;
use crate::output::is_quiet;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::PIN, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn empty(label: &str) {
    println!("{} {}", Icons::EMPTY, label.style(theme().muted.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

/// One-line card: name, address and where tapping it would navigate
pub fn destination_line(destination: &Destination) {
    println!(
        "{} {}  {}  {} {}",
        Icons::PIN,
        destination.name.style(theme().place.clone()),
        dim(&destination.address),
        Icons::RIGHT,
        muted(&destination.coordinate().to_string())
    );
}

pub fn destination_new(destination: &Destination) {
    println!(
        "{} {} {}",
        Icons::NEW.style(theme().success.clone()),
        destination.name.style(theme().place.clone()),
        muted(&destination.id.to_string())
    );
}

pub fn destination_updated(destination: &Destination) {
    println!(
        "{} {} {}",
        Icons::MOD.style(theme().warn.clone()),
        destination.name.style(theme().place.clone()),
        muted(&destination.id.to_string())
    );
}

pub fn destination_deleted(id: &str) {
    println!("{} {}", Icons::DEL.style(theme().error.clone()), id);
}
