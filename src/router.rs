// src/router.rs - Path → page mapping and the session guard
//
// Presence of a session token is the only input; the token is never verified
// here. Protected pages send anonymous users to /login, public-only pages send
// logged-in users to /dashboard, and anything unknown lands on /dashboard.

use std::fmt;

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const MYPAGE_PATH: &str = "/mypage";

/// A renderable page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Login,
    Signup,
    Dashboard,
    MyPage,
    AnalysisDetail { id: String },
}

impl Page {
    pub fn path(&self) -> String {
        match self {
            Page::Login => LOGIN_PATH.into(),
            Page::Signup => SIGNUP_PATH.into(),
            Page::Dashboard => DASHBOARD_PATH.into(),
            Page::MyPage => MYPAGE_PATH.into(),
            Page::AnalysisDetail { id } => analysis_path(id),
        }
    }

    fn access(&self) -> Access {
        match self {
            Page::Login | Page::Signup => Access::PublicOnly,
            Page::Dashboard | Page::MyPage | Page::AnalysisDetail { .. } => Access::Protected,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Protected,
    PublicOnly,
}

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Page),
    Redirect(String),
}

pub fn analysis_path(id: &str) -> String {
    format!("/analysis/{id}")
}

/// Match a path to a page. Query strings and a trailing slash are ignored.
pub fn match_path(path: &str) -> Option<Page> {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let path = path.trim_end_matches('/');
    match path {
        LOGIN_PATH => Some(Page::Login),
        SIGNUP_PATH => Some(Page::Signup),
        DASHBOARD_PATH => Some(Page::Dashboard),
        MYPAGE_PATH => Some(Page::MyPage),
        other => {
            let id = other.strip_prefix("/analysis/")?;
            if matches!(id, "" | "." | "..") || id.contains('/') {
                return None;
            }
            Some(Page::AnalysisDetail { id: id.to_string() })
        }
    }
}

/// One routing step for `path` given whether a session token is stored.
pub fn resolve(path: &str, has_token: bool) -> Resolution {
    let Some(page) = match_path(path) else {
        return Resolution::Redirect(DASHBOARD_PATH.into());
    };
    match (page.access(), has_token) {
        (Access::Protected, false) => Resolution::Redirect(LOGIN_PATH.into()),
        (Access::PublicOnly, true) => Resolution::Redirect(DASHBOARD_PATH.into()),
        _ => Resolution::Render(page),
    }
}

/// Follow redirects until a page renders.
pub fn resolve_page(path: &str, has_token: bool) -> Page {
    let mut current = path.to_string();
    // Every chain settles within three hops: unknown -> /dashboard -> /login.
    for _ in 0..4 {
        match resolve(&current, has_token) {
            Resolution::Render(page) => return page,
            Resolution::Redirect(next) => {
                tracing::debug!("Redirect {current} -> {next}");
                current = next;
            }
        }
    }
    if has_token {
        Page::Dashboard
    } else {
        Page::Login
    }
}
