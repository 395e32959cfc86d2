use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::domain::a001_payroll::ui::dashboard::PayrollDashboard;
use crate::layout::RootLayout;
use crate::system::auth::guard::RequireSession;
use crate::system::pages::{home::HomePage, login::LoginPage};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <RootLayout>
            <Router>
                <Routes fallback=|| view! { <div class="not-found">"Không tìm thấy trang"</div> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/admin/login") view=LoginPage />
                    <Route
                        path=path!("/admin/dashboard")
                        view=|| view! { <RequireSession><PayrollDashboard /></RequireSession> }
                    />
                </Routes>
            </Router>
        </RootLayout>
    }
}
