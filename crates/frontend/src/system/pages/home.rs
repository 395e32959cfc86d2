use leptos::prelude::*;
use leptos_router::components::A;
use thaw::*;

use crate::layout::{APP_DESCRIPTION, APP_TITLE};
use crate::shared::navigation::LOGIN_ROUTE;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-page">
            <Card attr:style="max-width: 480px; margin: 80px auto;">
                <Flex vertical=true gap=FlexGap::Large>
                    <h1>{APP_TITLE}</h1>
                    <p>{APP_DESCRIPTION}</p>
                    <A href=LOGIN_ROUTE>"Đăng nhập quản trị"</A>
                </Flex>
            </Card>
        </div>
    }
}
