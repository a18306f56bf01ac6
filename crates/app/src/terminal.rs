//! Line-oriented terminal front-end
//!
//! Stands in for the web presentation layer: one command per route,
//! flashes printed as `[severity] message`, issued one-time codes printed
//! on their own channel line.

use std::io::{self, Write};
use std::sync::Arc;

use inkpad_core::Note;

use crate::controller::auth::{self, IssuedCode, RegisterForm};
use crate::controller::profile::{self, ProfileForm};
use crate::controller::{notes, Outcome};
use crate::state::AppState;

const HELP: &str = "\
commands:
  register                 create an account
  login                    log in by username or email
  logout                   log out
  forgot                   request a password-reset code
  reset-verify <code>      verify a password-reset code
  reset                    set a new password
  notes [sort]             list active notes (date_desc, date_asc,
                           title_asc, title_desc, updated_desc)
  new                      create a note
  edit <id>                edit a note
  archive <id>             move a note to the archive
  archive-list             list archived notes
  restore <id>             restore an archived note
  delete <id>              permanently delete an archived note
  profile                  show your profile
  upload <path>            upload a profile picture
  profile-otp              request a profile-update code
  profile-verify <code>    verify a profile-update code
  profile-update           apply a profile edit
  help                     show this message
  quit                     exit";

pub fn run(state: Arc<AppState>) -> io::Result<()> {
    let sid = state.open_session();

    println!("inkpad - type 'help' for commands");
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let arg = parts.next().unwrap_or("");

        match command {
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,

            "register" => {
                let form = read_register_form()?;
                show(auth::register(&state, form));
            }
            "login" => {
                let identifier = prompt("username or email")?;
                let password = prompt("password")?;
                show(auth::login(&state, sid, &identifier, &password));
            }
            "logout" => show(auth::logout(&state, sid)),

            "forgot" => {
                let identifier = prompt("username or email")?;
                let (outcome, issued) = auth::forgot_password(&state, sid, &identifier);
                show(outcome);
                deliver(issued);
            }
            "reset-verify" => show(auth::verify_reset_code(&state, sid, arg)),
            "reset" => {
                let password = prompt("new password")?;
                let confirm = prompt("confirm password")?;
                show(auth::reset_password(&state, sid, &password, &confirm));
            }

            "notes" => {
                let (outcome, listing) = notes::home(&state, sid, arg);
                show(outcome);
                print_notes(&listing);
            }
            "new" => {
                let title = prompt("title")?;
                let content = prompt("content")?;
                show(notes::create(&state, sid, &title, &content));
            }
            "edit" => match parse_id(arg) {
                Some(id) => {
                    let title = prompt("title")?;
                    let content = prompt("content")?;
                    show(notes::edit(&state, sid, id, &title, &content));
                }
                None => println!("usage: edit <id>"),
            },
            "archive" => match parse_id(arg) {
                Some(id) => show(notes::archive(&state, sid, id)),
                None => println!("usage: archive <id>"),
            },
            "archive-list" => {
                let (outcome, listing) = notes::archive_view(&state, sid);
                show(outcome);
                print_notes(&listing);
            }
            "restore" => match parse_id(arg) {
                Some(id) => show(notes::restore(&state, sid, id)),
                None => println!("usage: restore <id>"),
            },
            "delete" => match parse_id(arg) {
                Some(id) => show(notes::delete(&state, sid, id)),
                None => println!("usage: delete <id>"),
            },

            "profile" => {
                let (outcome, user) = profile::view(&state, sid);
                show(outcome);
                if let Some(user) = user {
                    println!("{} <{}>", user.full_name(), user.email);
                    println!("dob {} (age {}), contact {}", user.dob, user.age, user.contact);
                    println!("address: {}", user.address);
                    if let Some(picture) = &user.profile_picture {
                        println!("picture: {picture}");
                    }
                }
            }
            "upload" => {
                if arg.is_empty() {
                    println!("usage: upload <path>");
                } else {
                    match std::fs::read(arg) {
                        Ok(bytes) => show(profile::upload_picture(&state, sid, arg, &bytes)),
                        Err(e) => println!("could not read {arg}: {e}"),
                    }
                }
            }
            "profile-otp" => {
                let (outcome, issued) = profile::request_code(&state, sid);
                show(outcome);
                deliver(issued);
            }
            "profile-verify" => show(profile::verify_code(&state, sid, arg)),
            "profile-update" => {
                println!("leave a field blank to keep its current value");
                let form = ProfileForm {
                    first_name: prompt("first name")?,
                    middle_name: prompt("middle name")?,
                    last_name: prompt("last name")?,
                    dob: prompt("date of birth (YYYY-MM-DD)")?,
                    contact: prompt("contact")?,
                    address: prompt("address")?,
                    email: prompt("email")?,
                };
                show(profile::update(&state, sid, form));
            }

            other => println!("unknown command: {other} (try 'help')"),
        }
    }

    state.end_session(sid);
    Ok(())
}

fn read_register_form() -> io::Result<RegisterForm> {
    Ok(RegisterForm {
        username: prompt("username")?,
        email: prompt("email")?,
        password: prompt("password")?,
        confirm_password: prompt("confirm password")?,
        first_name: prompt("first name")?,
        middle_name: prompt("middle name (optional)")?,
        last_name: prompt("last name")?,
        dob: prompt("date of birth (YYYY-MM-DD)")?,
        contact: prompt("contact")?,
        street: prompt("street")?,
        barangay: prompt("barangay")?,
        municipality: prompt("municipality")?,
        province: prompt("province")?,
        zipcode: prompt("zipcode")?,
    })
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim_end_matches(['\r', '\n']).to_string())
}

fn parse_id(arg: &str) -> Option<u64> {
    arg.parse().ok()
}

fn show(outcome: Outcome) {
    for flash in &outcome.flashes {
        println!("[{}] {}", flash.severity.label(), flash.message);
    }
}

fn deliver(issued: Option<IssuedCode>) {
    // The demo delivery channel: in a hardened deployment this would be
    // an email or SMS, never part of the page response.
    if let Some(issued) = issued {
        println!(
            "(out-of-band) your code is {}, valid until {}",
            issued.code,
            issued.expires_at.format("%H:%M:%S")
        );
    }
}

fn print_notes(listing: &[Note]) {
    if listing.is_empty() {
        println!("(no notes)");
        return;
    }
    for note in listing {
        let updated = note
            .updated_at
            .map(|t| format!(", updated {}", t.format("%Y-%m-%d %H:%M")))
            .unwrap_or_default();
        let created = note
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "undated".to_string());
        println!(
            "#{} [{}] {} (created {}{})",
            note.id,
            note.status.label(),
            note.title,
            created,
            updated
        );
    }
}
