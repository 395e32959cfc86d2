use std::rc::Rc;

use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

pub const HOME_ROUTE: &str = "/";
pub const LOGIN_ROUTE: &str = "/admin/login";
pub const DASHBOARD_ROUTE: &str = "/admin/dashboard";

pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Client-side navigation through the router. Must be created inside `<Router>`.
#[derive(Clone)]
pub struct RouterNavigator {
    navigate: Rc<dyn Fn(&str)>,
}

impl RouterNavigator {
    pub fn new() -> Self {
        let navigate = use_navigate();
        Self {
            navigate: Rc::new(move |path: &str| navigate(path, NavigateOptions::default())),
        }
    }
}

impl Navigator for RouterNavigator {
    fn navigate(&self, path: &str) {
        log::debug!("navigate -> {}", path);
        (self.navigate)(path);
    }
}
