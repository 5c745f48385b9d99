// src/cli/account.rs - login, signup, logout, me, passwd, rename

use anyhow::{bail, Result};

use super::AppContext;
use crate::pages::auth::{self, LoginForm, SignupForm};
use crate::pages::mypage::MyPage;
use crate::router::{LOGIN_PATH, MYPAGE_PATH, SIGNUP_PATH};

fn prompt_text(label: &str, given: Option<&str>) -> Result<String> {
    match given {
        Some(v) => Ok(v.to_string()),
        None => Ok(inquire::Text::new(label).prompt()?),
    }
}

fn prompt_password(label: &str) -> Result<String> {
    Ok(inquire::Password::new(label)
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?)
}

fn already_logged_in(ctx: &AppContext) {
    println!(
        "Already logged in as {} <{}>. Run `dropsee logout` first to switch accounts.",
        ctx.session.display_name(),
        ctx.session.email()
    );
}

pub async fn run_login(ctx: &mut AppContext, email: Option<&str>) -> Result<()> {
    if ctx.enter(LOGIN_PATH)?.is_none() {
        already_logged_in(ctx);
        return Ok(());
    }
    let email = prompt_text("Email:", email)?;
    let password = prompt_password("Password:")?;

    let mut form = LoginForm::new(&email, &password);
    match form.submit(&mut ctx.session, &ctx.client).await {
        Some(_) => {
            println!("Logged in. Hello, {}", ctx.session.display_name());
            Ok(())
        }
        None => bail!("{}", form.error().unwrap_or_default()),
    }
}

pub async fn run_signup(ctx: &AppContext, name: Option<&str>, email: Option<&str>) -> Result<()> {
    if ctx.enter(SIGNUP_PATH)?.is_none() {
        already_logged_in(ctx);
        return Ok(());
    }
    let name = prompt_text("Name:", name)?;
    let email = prompt_text("Email:", email)?;
    let password = prompt_password("Password (at least 6 characters):")?;
    let confirm = prompt_password("Confirm password:")?;
    let mut form = SignupForm::new(&name, &email, &password, &confirm);
    match form.submit(&ctx.client).await {
        Some(redirect) => {
            if let Some(notice) = redirect.notice {
                println!("{notice}");
            }
            Ok(())
        }
        None => bail!("{}", form.error().unwrap_or_default()),
    }
}

pub fn run_logout(ctx: &mut AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    auth::logout(&mut ctx.session)?;
    println!("Logged out.");
    Ok(())
}

pub async fn run_me(ctx: &mut AppContext) -> Result<()> {
    ctx.enter(MYPAGE_PATH)?;
    let mut page = MyPage::new();
    page.load_profile(&mut ctx.session, &ctx.client).await;
    if let Some(e) = page.error() {
        bail!("{e}");
    }
    let profile = page.profile_view(&ctx.session);
    println!("  Name:         {}", profile.name);
    println!("  Email:        {}", profile.email);
    println!("  Member since: {}", profile.member_since);
    Ok(())
}

pub async fn run_passwd(ctx: &AppContext) -> Result<()> {
    ctx.enter(MYPAGE_PATH)?;
    let mut page = MyPage::new();
    page.password.open();
    page.password.set_fields(
        &prompt_password("Current password:")?,
        &prompt_password("New password (at least 6 characters):")?,
        &prompt_password("Confirm new password:")?,
    );
    page.change_password(&ctx.session, &ctx.client).await;
    if let Some(e) = &page.password.error {
        bail!("{e}");
    }
    if let Some(notice) = page.notice() {
        println!("{notice}");
    }
    Ok(())
}

pub async fn run_rename(ctx: &mut AppContext, name: &str) -> Result<()> {
    ctx.enter(MYPAGE_PATH)?;
    let mut page = MyPage::new();
    page.rename(&mut ctx.session, &ctx.client, name).await;
    if let Some(e) = page.error() {
        bail!("{e}");
    }
    if let Some(notice) = page.notice() {
        println!("{notice} Hello, {}", ctx.session.display_name());
    }
    Ok(())
}
