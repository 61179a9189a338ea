/// The app's pages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Player,
    Liked,
    Search,
    Login,
    Signup,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Player,
        Route::Liked,
        Route::Search,
        Route::Login,
        Route::Signup,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Player => "/",
            Self::Liked => "/liked",
            Self::Search => "/search",
            Self::Login => "/login",
            Self::Signup => "/signup",
        }
    }

    /// Exact match on a path; a trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|r| r.path() == trimmed)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Liked => "Liked Songs",
            Self::Search => "Search",
            Self::Login => "Log in",
            Self::Signup => "Sign up",
        }
    }

    pub fn requires_session(self) -> bool {
        matches!(self, Self::Liked)
    }

    pub fn is_auth_page(self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }
}

/// A page plus its optional `next` return path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub route: Route,
    pub next: Option<String>,
}

impl Location {
    pub fn new(route: Route) -> Self {
        Self { route, next: None }
    }

    /// Parse `/path?next=/other`. Unknown paths land on the player; a
    /// `next` that is not a safe in-app path is dropped.
    pub fn parse(raw: &str) -> Self {
        let (path, query) = raw.trim().split_once('?').unwrap_or((raw.trim(), ""));
        let route = Route::from_path(path).unwrap_or_else(|| {
            log::warn!("unknown location {path:?}, opening the player");
            Route::Player
        });

        let next = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "next")
            .and_then(|(_, value)| urlencoding::decode(value).ok())
            .and_then(|value| sanitize_next(&value));

        Self { route, next }
    }

    pub fn to_url(&self) -> String {
        match &self.next {
            Some(next) => format!("{}?next={}", self.route.path(), urlencoding::encode(next)),
            None => self.route.path().to_string(),
        }
    }
}

/// Accept only absolute in-app paths that name a known page.
pub fn sanitize_next(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw.starts_with('/') || raw.starts_with("//") || raw.contains('\\') {
        return None;
    }
    let path = raw.split(['?', '#']).next().unwrap_or(raw);
    Route::from_path(path).map(|r| r.path().to_string())
}

/// Where a visit to `location` actually ends up.
///
/// Protected pages send signed-out users to the login page with a return
/// path; the auth pages send signed-in users on to `next` or the player.
pub fn guard(location: &Location, signed_in: bool) -> Location {
    if location.route.requires_session() && !signed_in {
        return Location {
            route: Route::Login,
            next: Some(location.route.path().to_string()),
        };
    }
    if location.route.is_auth_page() && signed_in {
        return after_auth(location);
    }
    location.clone()
}

/// The page to open after a successful login or signup.
pub fn after_auth(location: &Location) -> Location {
    let route = location
        .next
        .as_deref()
        .and_then(sanitize_next)
        .and_then(|p| Route::from_path(&p))
        .filter(|r| !r.is_auth_page())
        .unwrap_or(Route::Player);
    Location::new(route)
}
