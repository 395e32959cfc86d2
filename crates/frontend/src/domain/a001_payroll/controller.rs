//! Dashboard orchestration: one method per user action.
//!
//! Every action that needs the credential reads it from the [`SessionStore`];
//! a missing credential or a 401 clears it and navigates to the login route.
//! Each action flips its own [`ActionStatus`] to `Pending` before the first
//! await, so re-invoking a pending action returns immediately.

use std::cell::{Ref, RefCell};

use super::api::PayrollApi;
use super::messages;
use super::state::{ActionStatus, DashboardState, Notice, SampleKind};
use crate::shared::api_utils::ApiError;
use crate::shared::download::BinarySaver;
use crate::shared::navigation::{Navigator, HOME_ROUTE, LOGIN_ROUTE};
use crate::system::auth::storage::SessionStore;

pub struct DashboardController<A: PayrollApi, S, N, B> {
    api: A,
    session: S,
    navigator: N,
    saver: B,
    state: RefCell<DashboardState<A::File>>,
    on_change: Option<Box<dyn Fn()>>,
}

impl<A, S, N, B> DashboardController<A, S, N, B>
where
    A: PayrollApi,
    S: SessionStore,
    N: Navigator,
    B: BinarySaver,
{
    pub fn new(api: A, session: S, navigator: N, saver: B) -> Self {
        Self {
            api,
            session,
            navigator,
            saver,
            state: RefCell::new(DashboardState::default()),
            on_change: None,
        }
    }

    /// Called after every state change
    pub fn with_on_change(mut self, on_change: impl Fn() + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn state(&self) -> Ref<'_, DashboardState<A::File>> {
        self.state.borrow()
    }

    fn update(&self, apply: impl FnOnce(&mut DashboardState<A::File>)) {
        apply(&mut self.state.borrow_mut());
        if let Some(on_change) = &self.on_change {
            on_change();
        }
    }

    /// Credential for the next call, or a redirect to login when absent
    fn require_token(&self) -> Option<String> {
        let token = self.session.token();
        if token.is_none() {
            self.navigator.navigate(LOGIN_ROUTE);
        }
        token
    }

    fn handle_unauthorized(&self) {
        log::warn!("Session rejected by the server, signing out");
        self.session.clear();
        self.navigator.navigate(LOGIN_ROUTE);
    }

    /// Fetches records and stats, replacing the current snapshot on success.
    pub async fn load(&self) {
        let Some(token) = self.require_token() else {
            return;
        };

        match self.api.list(&token).await {
            Ok(response) => self.update(|s| {
                s.payrolls = response.payrolls;
                s.stats = response.stats;
                s.load_error = None;
                s.initial_loading = false;
            }),
            Err(ApiError::Unauthorized) => {
                self.update(|s| s.initial_loading = false);
                self.handle_unauthorized();
            }
            Err(e) => {
                log::error!("Failed to load payrolls: {}", e);
                self.update(|s| {
                    s.load_error = Some(messages::LOAD_FAILED.to_string());
                    s.initial_loading = false;
                });
            }
        }
    }

    pub fn select_files(&self, files: Vec<A::File>) {
        self.update(|s| s.selected_files = files);
    }

    /// Sends the selection in one multipart request.
    pub async fn upload(&self) {
        let files = {
            let state = self.state.borrow();
            if state.upload.is_pending() {
                return;
            }
            state.selected_files.clone()
        };

        if files.is_empty() {
            self.update(|s| s.notice = Some(Notice::error(messages::NO_FILES_SELECTED)));
            return;
        }

        let Some(token) = self.require_token() else {
            return;
        };

        self.update(|s| {
            s.upload = ActionStatus::Pending;
            s.notice = None;
        });

        match self.api.upload(&token, &files).await {
            Ok(response) => {
                self.update(|s| {
                    s.notice = Some(Notice::success(messages::upload_success(
                        response.total_records,
                        response.files_processed,
                    )))
                });
                self.load().await;
                self.update(|s| s.selected_files.clear());
            }
            Err(ApiError::Unauthorized) => self.handle_unauthorized(),
            Err(ApiError::Rejected(error)) => {
                self.update(|s| s.notice = Some(Notice::error(messages::upload_rejected(&error))))
            }
            Err(e) => {
                log::error!("Upload failed: {}", e);
                self.update(|s| s.notice = Some(Notice::error(messages::UPLOAD_FAILED)));
            }
        }

        self.update(|s| s.upload = ActionStatus::Idle);
    }

    pub async fn download_sample(&self) {
        self.download(SampleKind::Single).await
    }

    pub async fn download_sample_bundle(&self) {
        self.download(SampleKind::Bundle).await
    }

    async fn download(&self, kind: SampleKind) {
        if self.state.borrow().sample_status(kind).is_pending() {
            return;
        }

        let Some(token) = self.require_token() else {
            return;
        };

        self.update(|s| *s.sample_status_mut(kind) = ActionStatus::Pending);

        let failure = match self.api.download(&token, kind.path()).await {
            Ok(bytes) => match self
                .saver
                .save(&bytes, kind.file_name(), kind.content_type())
            {
                Ok(()) => None,
                Err(e) => {
                    log::error!("Saving {} failed: {}", kind.file_name(), e);
                    Some(messages::SAMPLE_DOWNLOAD_FAILED)
                }
            },
            Err(ApiError::Unauthorized) => {
                self.handle_unauthorized();
                None
            }
            Err(ApiError::Transport(e)) => {
                log::error!("Download of {} failed: {}", kind.file_name(), e);
                Some(messages::SAMPLE_DOWNLOAD_FAILED)
            }
            Err(e) => {
                log::warn!("Download of {} rejected: {}", kind.file_name(), e);
                Some(messages::SAMPLE_DOWNLOAD_REJECTED)
            }
        };

        self.update(|s| {
            *s.sample_status_mut(kind) = ActionStatus::Idle;
            if let Some(text) = failure {
                s.notice = Some(Notice::error(text));
            }
        });
    }

    /// Clears the credential and returns to the home route; no server call.
    pub fn logout(&self) {
        self.session.clear();
        self.navigator.navigate(HOME_ROUTE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_payroll::state::NoticeKind;
    use crate::system::auth::storage::MemorySessionStore;
    use async_trait::async_trait;
    use contracts::domain::a001_payroll::api::{SAMPLE_BUNDLE_PATH, SAMPLE_PATH};
    use contracts::domain::a001_payroll::{
        PayrollListResponse, PayrollRecord, PayrollStats, UploadResponse,
    };
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::FutureExt;
    use std::cell::Cell;

    fn record(id: i64, employee_id: &str) -> PayrollRecord {
        PayrollRecord {
            id,
            employee_id: employee_id.to_string(),
            full_name: "Nguyễn Văn An".to_string(),
            cccd: "049201000123".to_string(),
            position: None,
            salary_month: "2024-01".to_string(),
            total_income: 1_500_000.0,
            deductions: 0.0,
            net_salary: 1_500_000.0,
            source_file: "t1.xlsx".to_string(),
            created_at: "2024-01-05T00:00:00Z".to_string(),
        }
    }

    fn listing(records: Vec<PayrollRecord>) -> PayrollListResponse {
        let stats = PayrollStats {
            total_records: records.len() as i64,
            total_employees: records.len() as i64,
            total_salary: records.iter().map(|r| r.net_salary).sum(),
        };
        PayrollListResponse {
            payrolls: records,
            stats,
        }
    }

    #[derive(Default)]
    struct FakeApi {
        list_calls: Cell<usize>,
        upload_calls: RefCell<Vec<Vec<String>>>,
        download_calls: RefCell<Vec<String>>,
        list_results: RefCell<Vec<Result<PayrollListResponse, ApiError>>>,
        upload_result: RefCell<Option<Result<UploadResponse, ApiError>>>,
        download_error: RefCell<Option<ApiError>>,
        /// Holds the single-sample download until released
        sample_gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl FakeApi {
        fn listing_in_order(results: Vec<Result<PayrollListResponse, ApiError>>) -> Self {
            let api = Self::default();
            *api.list_results.borrow_mut() = results.into_iter().rev().collect();
            api
        }
    }

    #[async_trait(?Send)]
    impl PayrollApi for FakeApi {
        type File = String;

        async fn list(&self, _token: &str) -> Result<PayrollListResponse, ApiError> {
            self.list_calls.set(self.list_calls.get() + 1);
            self.list_results
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Ok(listing(Vec::new())))
        }

        async fn upload(&self, _token: &str, files: &[String]) -> Result<UploadResponse, ApiError> {
            self.upload_calls.borrow_mut().push(files.to_vec());
            self.upload_result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(ApiError::Status(500)))
        }

        async fn download(&self, _token: &str, path: &str) -> Result<Vec<u8>, ApiError> {
            self.download_calls.borrow_mut().push(path.to_string());
            if path == SAMPLE_PATH {
                let gate = self.sample_gate.borrow_mut().take();
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
            }
            match self.download_error.borrow_mut().take() {
                Some(e) => Err(e),
                None => Ok(path.as_bytes().to_vec()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNavigator(RefCell<Vec<String>>);

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.0.borrow_mut().push(path.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingSaver {
        saved: RefCell<Vec<(String, String, Vec<u8>)>>,
        fail: Cell<bool>,
    }

    impl BinarySaver for RecordingSaver {
        fn save(&self, bytes: &[u8], file_name: &str, content_type: &str) -> Result<(), String> {
            if self.fail.get() {
                return Err("blocked".to_string());
            }
            self.saved.borrow_mut().push((
                file_name.to_string(),
                content_type.to_string(),
                bytes.to_vec(),
            ));
            Ok(())
        }
    }

    type TestController =
        DashboardController<FakeApi, MemorySessionStore, RecordingNavigator, RecordingSaver>;

    fn controller(api: FakeApi) -> TestController {
        DashboardController::new(
            api,
            MemorySessionStore::with_token("token"),
            RecordingNavigator::default(),
            RecordingSaver::default(),
        )
    }

    fn notice(c: &TestController) -> Option<Notice> {
        c.state().notice.clone()
    }

    #[test]
    fn test_load_replaces_records_and_stats() {
        let c = controller(FakeApi::listing_in_order(vec![Ok(listing(vec![
            record(1, "NV1"),
            record(2, "NV2"),
        ]))]));
        assert!(c.state().initial_loading);

        block_on(c.load());

        let state = c.state();
        assert_eq!(state.payrolls.len(), 2);
        assert_eq!(state.stats.total_records, 2);
        assert!(!state.initial_loading);
        assert_eq!(state.load_error, None);
    }

    #[test]
    fn test_load_failure_keeps_records_and_sets_notice() {
        let c = controller(FakeApi::listing_in_order(vec![
            Ok(listing(vec![record(1, "NV1")])),
            Err(ApiError::Transport("offline".into())),
        ]));
        block_on(c.load());
        block_on(c.load());

        let state = c.state();
        assert_eq!(state.payrolls.len(), 1);
        assert_eq!(state.load_error.as_deref(), Some(messages::LOAD_FAILED));
        assert!(c.navigator.0.borrow().is_empty());
    }

    #[test]
    fn test_unauthorized_load_clears_credential_and_redirects() {
        let c = controller(FakeApi::listing_in_order(vec![Err(ApiError::Unauthorized)]));
        block_on(c.load());

        assert_eq!(c.session.token(), None);
        assert_eq!(*c.navigator.0.borrow(), vec![LOGIN_ROUTE.to_string()]);
        assert!(!c.state().initial_loading);
    }

    #[test]
    fn test_missing_credential_redirects_without_request() {
        let c = DashboardController::new(
            FakeApi::default(),
            MemorySessionStore::default(),
            RecordingNavigator::default(),
            RecordingSaver::default(),
        );
        block_on(c.load());
        block_on(c.download_sample());

        assert_eq!(c.api.list_calls.get(), 0);
        assert!(c.api.download_calls.borrow().is_empty());
        assert_eq!(
            *c.navigator.0.borrow(),
            vec![LOGIN_ROUTE.to_string(), LOGIN_ROUTE.to_string()]
        );
    }

    #[test]
    fn test_upload_without_files_never_calls_api() {
        let c = controller(FakeApi::default());
        for _ in 0..3 {
            block_on(c.upload());
            assert_eq!(
                notice(&c),
                Some(Notice::error(messages::NO_FILES_SELECTED))
            );
        }
        assert!(c.api.upload_calls.borrow().is_empty());
        assert_eq!(c.api.list_calls.get(), 0);
    }

    #[test]
    fn test_successful_upload_reloads_and_clears_selection() {
        let api = FakeApi::listing_in_order(vec![Ok(listing(vec![
            record(1, "NV1"),
            record(2, "NV2"),
            record(3, "NV3"),
        ]))]);
        *api.upload_result.borrow_mut() = Some(Ok(UploadResponse {
            total_records: 3,
            files_processed: 2,
            files: Vec::new(),
        }));
        let c = controller(api);

        c.select_files(vec!["t1.xlsx".into(), "t2.xlsx".into()]);
        block_on(c.upload());

        assert_eq!(
            *c.api.upload_calls.borrow(),
            vec![vec!["t1.xlsx".to_string(), "t2.xlsx".to_string()]]
        );
        assert_eq!(c.api.list_calls.get(), 1);

        let state = c.state();
        assert_eq!(state.stats.total_records, 3);
        assert!(state.selected_files.is_empty());
        assert_eq!(state.upload, ActionStatus::Idle);
        assert_eq!(
            state.notice,
            Some(Notice::success("Thành công! Đã import 3 bản ghi từ 2 file(s)"))
        );
    }

    #[test]
    fn test_refresh_failure_after_upload_is_visible() {
        let api = FakeApi::listing_in_order(vec![Err(ApiError::Status(500))]);
        *api.upload_result.borrow_mut() = Some(Ok(UploadResponse {
            total_records: 5,
            files_processed: 1,
            files: Vec::new(),
        }));
        let c = controller(api);
        c.select_files(vec!["t1.xlsx".into()]);
        block_on(c.upload());

        let state = c.state();
        assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Success));
        assert_eq!(state.load_error.as_deref(), Some(messages::LOAD_FAILED));
    }

    #[test]
    fn test_upload_rejection_shows_server_text_and_keeps_selection() {
        let api = FakeApi::default();
        *api.upload_result.borrow_mut() =
            Some(Err(ApiError::Rejected("File x.csv: định dạng không được hỗ trợ".into())));
        let c = controller(api);
        c.select_files(vec!["x.csv".into()]);
        block_on(c.upload());

        assert_eq!(
            notice(&c),
            Some(Notice::error("Lỗi: File x.csv: định dạng không được hỗ trợ"))
        );
        assert_eq!(c.state().selected_files.len(), 1);
        assert_eq!(c.api.list_calls.get(), 0);
    }

    #[test]
    fn test_upload_transport_failure_shows_generic_text() {
        let c = controller(FakeApi::default());
        c.select_files(vec!["t1.xlsx".into()]);
        block_on(c.upload());
        assert_eq!(notice(&c), Some(Notice::error(messages::UPLOAD_FAILED)));
        assert_eq!(c.state().upload, ActionStatus::Idle);
    }

    #[test]
    fn test_unauthorized_upload_signs_out() {
        let api = FakeApi::default();
        *api.upload_result.borrow_mut() = Some(Err(ApiError::Unauthorized));
        let c = controller(api);
        c.select_files(vec!["t1.xlsx".into()]);
        block_on(c.upload());

        assert_eq!(c.session.token(), None);
        assert_eq!(*c.navigator.0.borrow(), vec![LOGIN_ROUTE.to_string()]);
    }

    #[test]
    fn test_downloads_save_with_fixed_names() {
        let c = controller(FakeApi::default());
        block_on(c.download_sample());
        block_on(c.download_sample_bundle());

        let saved = c.saver.saved.borrow();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].0, "bang-luong-mau.xlsx");
        assert_eq!(saved[0].2, SAMPLE_PATH.as_bytes());
        assert_eq!(saved[1].0, "bang-luong-mau-files.zip");
        assert_eq!(saved[1].1, "application/zip");
        assert_eq!(notice(&c), None);
    }

    #[test]
    fn test_pending_download_suppresses_second_click() {
        let api = FakeApi::default();
        let (release, gate) = oneshot::channel();
        *api.sample_gate.borrow_mut() = Some(gate);
        let c = controller(api);

        let mut first = Box::pin(c.download_sample());
        assert!((&mut first).now_or_never().is_none());
        assert!(c.state().sample.is_pending());

        // Second click while pending finishes at once without a request
        assert!(c.download_sample().now_or_never().is_some());
        assert_eq!(c.api.download_calls.borrow().len(), 1);

        // The bundle download is not blocked by the pending sample
        block_on(c.download_sample_bundle());
        assert_eq!(
            *c.api.download_calls.borrow(),
            vec![SAMPLE_PATH.to_string(), SAMPLE_BUNDLE_PATH.to_string()]
        );

        release.send(()).unwrap();
        block_on(first);

        assert_eq!(c.state().sample, ActionStatus::Idle);
        assert_eq!(c.saver.saved.borrow().len(), 2);
    }

    #[test]
    fn test_download_failures() {
        let api = FakeApi::default();
        *api.download_error.borrow_mut() = Some(ApiError::Status(500));
        let c = controller(api);
        block_on(c.download_sample_bundle());
        assert_eq!(
            notice(&c),
            Some(Notice::error(messages::SAMPLE_DOWNLOAD_REJECTED))
        );

        *c.api.download_error.borrow_mut() = Some(ApiError::Transport("offline".into()));
        block_on(c.download_sample());
        assert_eq!(
            notice(&c),
            Some(Notice::error(messages::SAMPLE_DOWNLOAD_FAILED))
        );

        c.saver.fail.set(true);
        block_on(c.download_sample());
        assert_eq!(
            notice(&c),
            Some(Notice::error(messages::SAMPLE_DOWNLOAD_FAILED))
        );
        assert_eq!(c.state().sample, ActionStatus::Idle);
        assert_eq!(c.state().bundle, ActionStatus::Idle);
    }

    #[test]
    fn test_unauthorized_download_signs_out() {
        let api = FakeApi::default();
        *api.download_error.borrow_mut() = Some(ApiError::Unauthorized);
        let c = controller(api);
        block_on(c.download_sample());

        assert_eq!(c.session.token(), None);
        assert_eq!(*c.navigator.0.borrow(), vec![LOGIN_ROUTE.to_string()]);
        assert!(c.saver.saved.borrow().is_empty());
    }

    #[test]
    fn test_logout_always_goes_home() {
        let c = controller(FakeApi::default());
        c.logout();
        c.logout();

        assert_eq!(c.session.token(), None);
        assert_eq!(
            *c.navigator.0.borrow(),
            vec![HOME_ROUTE.to_string(), HOME_ROUTE.to_string()]
        );
    }

    #[test]
    fn test_on_change_fires_for_state_updates() {
        let hits = std::rc::Rc::new(Cell::new(0));
        let counter = hits.clone();
        let c = controller(FakeApi::default()).with_on_change(move || counter.set(counter.get() + 1));

        block_on(c.load());
        assert!(hits.get() >= 1);
    }
}
