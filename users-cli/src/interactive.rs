use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use users_client::{NoticeKind, UserApi, UserDirectory, UserId};

use crate::print_user;

const HELP: &str = "\
commands:
  list                 re-fetch and show users
  name <text>          set the form's name
  email <text>         set the form's email
  save                 create, or update the user being edited
  edit <id>            load a user into the form
  cancel               leave edit mode
  delete <id>          delete a user (asks first)
  quit";

type Input = Lines<BufReader<Stdin>>;

async fn prompt(input: &mut Input, text: &str) -> anyhow::Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(input.next_line().await?)
}

pub async fn confirm(question: &str) -> anyhow::Result<bool> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    ask(&mut input, question).await
}

async fn ask(input: &mut Input, question: &str) -> anyhow::Result<bool> {
    let answer = prompt(input, &format!("{question} [y/N] ")).await?;
    Ok(matches!(answer.as_deref().map(str::trim), Some("y" | "Y" | "yes")))
}

fn render<A: UserApi>(directory: &mut UserDirectory<A>) {
    directory.expire_notices();
    for notice in directory.notices() {
        let tag = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        println!("[{tag}] {}", notice.text);
    }
    if directory.is_loading() {
        println!("loading...");
    } else if directory.users().is_empty() {
        println!("No users yet. Add your first user with `name`, `email` and `save`.");
    } else {
        for user in directory.users() {
            print_user(user);
        }
    }
}

fn form_title<A: UserApi>(directory: &UserDirectory<A>) -> String {
    let form = directory.form();
    match directory.editing() {
        Some(id) => format!("edit #{id} (name={:?}, email={:?})", form.name, form.email),
        None => format!("new user (name={:?}, email={:?})", form.name, form.email),
    }
}

pub async fn run<A: UserApi>(api: A) -> anyhow::Result<()> {
    let mut directory = UserDirectory::new(api);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    directory.mount().await;
    render(&mut directory);
    println!("{HELP}");

    loop {
        let Some(line) = prompt(&mut input, &format!("{}> ", form_title(&directory))).await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "list" => directory.refresh().await,
            "name" => directory.set_name(rest),
            "email" => directory.set_email(rest),
            "save" => {
                directory.submit().await;
            }
            "edit" => {
                let selected = rest
                    .parse::<UserId>()
                    .ok()
                    .and_then(|id| directory.users().iter().find(|u| u.id == id).cloned());
                match selected {
                    Some(user) => directory.edit(&user),
                    None => println!("no such user in the list: {rest}"),
                }
            }
            "cancel" => directory.cancel_edit(),
            "delete" => match rest.parse::<UserId>() {
                Ok(id) => {
                    directory.request_delete(id);
                    if ask(&mut input, &format!("Delete user {id}?")).await? {
                        directory.confirm_delete().await;
                    } else {
                        directory.dismiss_delete();
                    }
                }
                Err(_) => println!("usage: delete <id>"),
            },
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            other => println!("unknown command: {other} (try `help`)"),
        }

        if !matches!(command, "" | "help" | "name" | "email") {
            render(&mut directory);
        }
    }

    Ok(())
}
