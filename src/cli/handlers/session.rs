use std::time::Duration;

use crate::cli::commands::{LoginArgs, SettingsArgs};
use crate::cli::output::{format_session, SessionJson};
use crate::ops::session::Session;

use super::{print_json, print_lines, CmdResult, Context};

fn open(ctx: &Context) -> Session {
    Session::load(
        &ctx.home,
        Duration::from_millis(ctx.config.gateway.auth_latency_ms),
    )
}

fn show(ctx: &Context, session: &Session) -> CmdResult {
    let prefs = session.preferences();
    if ctx.json {
        return print_json(&SessionJson {
            user: session.user(),
            theme: prefs.theme,
            language: prefs.language,
        });
    }
    print_lines(format_session(session.user(), prefs.theme, prefs.language));
    Ok(())
}

pub(super) async fn cmd_login(ctx: &Context, args: LoginArgs) -> CmdResult {
    let mut session = open(ctx);
    let user = session.login(&args.username, &args.password).await?;
    if ctx.json {
        return print_json(&user);
    }
    println!("signed in as {}", user.name);
    Ok(())
}

pub(super) fn cmd_logout(ctx: &Context) -> CmdResult {
    let mut session = open(ctx);
    let was = session.user().map(|u| u.name.clone());
    session.logout()?;
    if ctx.json {
        return show(ctx, &session);
    }
    match was {
        Some(name) => println!("signed out {}", name),
        None => println!("not signed in"),
    }
    Ok(())
}

pub(super) fn cmd_whoami(ctx: &Context) -> CmdResult {
    show(ctx, &open(ctx))
}

pub(super) fn cmd_settings(ctx: &Context, args: SettingsArgs) -> CmdResult {
    let mut session = open(ctx);
    if let Some(t) = &args.theme {
        session.set_theme(t.parse()?)?;
    }
    if let Some(l) = &args.language {
        session.set_language(l.parse()?)?;
    }
    show(ctx, &session)
}
