use std::rc::Rc;

use contracts::domain::a001_payroll::{PayrollRecord, PayrollStats};
use contracts::shared::money::format_vnd;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_payroll::api::HttpPayrollApi;
use crate::domain::a001_payroll::controller::DashboardController;
use crate::domain::a001_payroll::messages;
use crate::domain::a001_payroll::state::{NoticeKind, SampleKind};
use crate::shared::download::BrowserSaver;
use crate::shared::navigation::RouterNavigator;
use crate::system::auth::storage::LocalStorageSession;

type BrowserDashboard =
    DashboardController<HttpPayrollApi, LocalStorageSession, RouterNavigator, BrowserSaver>;

#[component]
pub fn PayrollDashboard() -> impl IntoView {
    // Bumped by the controller after every state change
    let version = RwSignal::new(0u64);

    let controller: BrowserDashboard = DashboardController::new(
        HttpPayrollApi,
        LocalStorageSession,
        RouterNavigator::new(),
        BrowserSaver,
    )
    .with_on_change(move || version.update(|v| *v += 1));
    let controller = StoredValue::new_local(Rc::new(controller));

    let file_input = NodeRef::<leptos::html::Input>::new();

    Effect::new(move |_| {
        let c = controller.get_value();
        spawn_local(async move { c.load().await });
    });

    let initial_loading = move || {
        version.track();
        controller.with_value(|c| c.state().initial_loading)
    };
    let stats = move || -> PayrollStats {
        version.track();
        controller.with_value(|c| c.state().stats.clone())
    };
    let rows = move || -> Vec<PayrollRecord> {
        version.track();
        controller.with_value(|c| c.state().payrolls.clone())
    };
    let empty_placeholder = move || {
        version.track();
        controller.with_value(|c| c.state().empty_placeholder())
    };
    let selected_count = move || {
        version.track();
        controller.with_value(|c| c.state().selected_files.len())
    };
    let upload_pending = move || {
        version.track();
        controller.with_value(|c| c.state().upload.is_pending())
    };
    let can_upload = move || {
        version.track();
        controller.with_value(|c| c.state().can_upload())
    };
    let sample_pending = move |kind: SampleKind| {
        version.track();
        controller.with_value(|c| c.state().sample_status(kind).is_pending())
    };
    let notice = move || {
        version.track();
        controller.with_value(|c| c.state().notice.clone())
    };
    let load_error = move || {
        version.track();
        controller.with_value(|c| c.state().load_error.clone())
    };

    let on_file_change = move |ev: leptos::ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let files: Vec<web_sys::File> = input
            .files()
            .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
            .unwrap_or_default();
        controller.with_value(|c| c.select_files(files));
    };

    let on_upload = move |_: leptos::ev::MouseEvent| {
        let c = controller.get_value();
        spawn_local(async move {
            c.upload().await;
            if c.state().selected_files.is_empty() {
                if let Some(input) = file_input.get_untracked() {
                    input.set_value("");
                }
            }
        });
    };

    let on_download = move |kind: SampleKind| {
        let c = controller.get_value();
        spawn_local(async move {
            match kind {
                SampleKind::Single => c.download_sample().await,
                SampleKind::Bundle => c.download_sample_bundle().await,
            }
        });
    };

    let on_refresh = move |_: leptos::ev::MouseEvent| {
        let c = controller.get_value();
        spawn_local(async move { c.load().await });
    };

    let on_logout = move |_: leptos::ev::MouseEvent| controller.with_value(|c| c.logout());

    view! {
        <Show
            when=move || !initial_loading()
            fallback=|| view! { <div class="dashboard__loading"><Spinner /></div> }
        >
            <div class="dashboard">
                <div class="dashboard__header">
                    <h1>"Dashboard - Hòa Thọ Điện Bàn"</h1>
                    <Button appearance=ButtonAppearance::Secondary on_click=on_logout>
                        "Đăng Xuất"
                    </Button>
                </div>

                <div class="dashboard__stats">
                    <Card attr:style="flex: 1;">
                        <div class="stat-card__title">"Tổng Bản Ghi"</div>
                        <div class="stat-card__value">
                            {move || stats().total_records.to_string()}
                        </div>
                    </Card>
                    <Card attr:style="flex: 1;">
                        <div class="stat-card__title">"Số Nhân Viên"</div>
                        <div class="stat-card__value">
                            {move || stats().total_employees.to_string()}
                        </div>
                    </Card>
                    <Card attr:style="flex: 1;">
                        <div class="stat-card__title">"Tổng Lương"</div>
                        <div class="stat-card__value">
                            {move || format_vnd(stats().total_salary)}
                        </div>
                    </Card>
                </div>

                <Card attr:style="margin-bottom: 24px;">
                    <h2>"Upload File Excel"</h2>
                    <p class="dashboard__hint">
                        "Chọn một hoặc nhiều file Excel chứa dữ liệu lương để import vào hệ thống"
                    </p>

                    <Flex vertical=true gap=FlexGap::Large>
                        <label for="files">"Chọn File Excel (.xlsx, .xls)"</label>
                        <input
                            id="files"
                            type="file"
                            multiple
                            accept=".xlsx,.xls"
                            node_ref=file_input
                            on:change=on_file_change
                        />
                        <Show when=move || { selected_count() > 0 }>
                            <span class="dashboard__hint">
                                {move || format!("Đã chọn {} file", selected_count())}
                            </span>
                        </Show>

                        {move || {
                            notice()
                                .map(|notice| {
                                    let class = match notice.kind {
                                        NoticeKind::Success => "notice notice--success",
                                        NoticeKind::Error => "notice notice--error",
                                    };
                                    view! { <div class=class>{notice.text}</div> }
                                })
                        }}

                        <div>
                            <Button
                                appearance=ButtonAppearance::Primary
                                on_click=on_upload
                                disabled=Signal::derive(move || !can_upload())
                            >
                                {move || if upload_pending() { "Đang Upload..." } else { "Upload Files" }}
                            </Button>
                        </div>
                    </Flex>

                    <div class="dashboard__samples">
                        <div>
                            <h4>"File Excel Mẫu"</h4>
                            <p class="dashboard__hint">
                                "Tải xuống file mẫu để tham khảo định dạng dữ liệu"
                            </p>
                        </div>
                        <Flex gap=FlexGap::Small>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| on_download(SampleKind::Single)
                                disabled=Signal::derive(move || sample_pending(SampleKind::Single))
                            >
                                {move || {
                                    if sample_pending(SampleKind::Single) { "Đang tạo..." } else { "File Đơn" }
                                }}
                            </Button>
                            <Button
                                appearance=ButtonAppearance::Secondary
                                on_click=move |_| on_download(SampleKind::Bundle)
                                disabled=Signal::derive(move || sample_pending(SampleKind::Bundle))
                            >
                                {move || {
                                    if sample_pending(SampleKind::Bundle) { "Đang tạo..." } else { "Nhiều File" }
                                }}
                            </Button>
                        </Flex>
                    </div>
                </Card>

                <Card>
                    <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                        <div>
                            <h2>"Dữ Liệu Lương"</h2>
                            <p class="dashboard__hint">
                                "Danh sách tất cả bản ghi lương đã được import"
                            </p>
                        </div>
                        <Button appearance=ButtonAppearance::Secondary on_click=on_refresh>
                            "Làm Mới"
                        </Button>
                    </Flex>

                    {move || load_error().map(|text| view! { <div class="notice notice--error">{text}</div> })}

                    <div class="dashboard__table">
                        <Table>
                            <TableHeader>
                                <TableRow>
                                    <TableHeaderCell min_width=90.0>"Mã NV"</TableHeaderCell>
                                    <TableHeaderCell min_width=180.0>"Họ Tên"</TableHeaderCell>
                                    <TableHeaderCell min_width=130.0>"CCCD"</TableHeaderCell>
                                    <TableHeaderCell min_width=120.0>"Chức Vụ"</TableHeaderCell>
                                    <TableHeaderCell min_width=110.0>"Tháng Lương"</TableHeaderCell>
                                    <TableHeaderCell min_width=130.0>"Thu Nhập"</TableHeaderCell>
                                    <TableHeaderCell min_width=130.0>"Khấu Trừ"</TableHeaderCell>
                                    <TableHeaderCell min_width=130.0>"Thực Lĩnh"</TableHeaderCell>
                                    <TableHeaderCell min_width=160.0>"File Nguồn"</TableHeaderCell>
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {move || {
                                    rows()
                                        .into_iter()
                                        .map(|record| view! { <PayrollRow record=record /> })
                                        .collect_view()
                                }}
                            </TableBody>
                        </Table>

                        {move || {
                            empty_placeholder()
                                .map(|text| view! { <div class="dashboard__empty">{text}</div> })
                        }}
                    </div>
                </Card>
            </div>
        </Show>
    }
}

#[component]
fn PayrollRow(record: PayrollRecord) -> impl IntoView {
    let position = record.position_label().to_string();
    let mismatch = messages::net_mismatch_hint(&record);
    let net_class = if mismatch.is_some() {
        "dashboard__net dashboard__net--mismatch"
    } else {
        "dashboard__net"
    };

    view! {
        <TableRow>
            <TableCell><strong>{record.employee_id}</strong></TableCell>
            <TableCell>{record.full_name}</TableCell>
            <TableCell>{record.cccd}</TableCell>
            <TableCell>{position}</TableCell>
            <TableCell>
                <Badge appearance=BadgeAppearance::Outline>{record.salary_month}</Badge>
            </TableCell>
            <TableCell>{format_vnd(record.total_income)}</TableCell>
            <TableCell>{format_vnd(record.deductions)}</TableCell>
            <TableCell>
                <strong class=net_class title=mismatch>{format_vnd(record.net_salary)}</strong>
            </TableCell>
            <TableCell><span class="dashboard__source">{record.source_file}</span></TableCell>
        </TableRow>
    }
}
