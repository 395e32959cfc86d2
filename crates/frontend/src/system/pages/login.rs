use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::api_utils::ApiError;
use crate::shared::navigation::{Navigator, RouterNavigator, DASHBOARD_ROUTE};
use crate::system::auth::api;
use crate::system::auth::storage::{LocalStorageSession, SessionStore};

fn login_error_text(error: &ApiError) -> String {
    match error {
        ApiError::Unauthorized => "Sai tên đăng nhập hoặc mật khẩu".to_string(),
        ApiError::Rejected(message) => message.clone(),
        other => format!("Không đăng nhập được: {}", other),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let navigator = StoredValue::new_local(RouterNavigator::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get();
        let password_val = password.get();

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::login(username_val, password_val).await {
                Ok(response) => {
                    LocalStorageSession.set_token(&response.token);
                    log::info!("Logged in as {}", response.username);
                    set_is_loading.set(false);
                    navigator.with_value(|n| n.navigate(DASHBOARD_ROUTE));
                }
                Err(e) => {
                    log::warn!("Login failed: {}", e);
                    set_error_message.set(Some(login_error_text(&e)));
                    set_is_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Hòa Thọ Điện Bàn"</h1>
                <h2>"Đăng nhập quản trị"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="username">"Tên đăng nhập"</label>
                        <input
                            type="text"
                            id="username"
                            value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Mật khẩu"</label>
                        <input
                            type="password"
                            id="password"
                            value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Đang đăng nhập..." } else { "Đăng nhập" }}
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_text() {
        assert_eq!(
            login_error_text(&ApiError::Unauthorized),
            "Sai tên đăng nhập hoặc mật khẩu"
        );
        assert_eq!(login_error_text(&ApiError::Rejected("x".into())), "x");
        assert_eq!(
            login_error_text(&ApiError::Status(503)),
            "Không đăng nhập được: HTTP 503"
        );
    }
}
