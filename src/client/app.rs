//! Client state machine
//!
//! ```text
//! LoggedOut ──submit_login──→ LoggingIn ──ok──→ LoggedIn(Idle)
//!     ↑                           └──err──→ LoggedOut (login_error)
//!     └──── logout / any 401 ──── LoggedIn(Idle | Loading | Error)
//! ```
//!
//! Every mutation re-fetches the history list from the server; nothing is
//! updated optimistically.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::http::GeoTrackerApi;
use super::session::{Session, SessionStore};
use super::ClientError;
use crate::services::geoip::GeoResult;
use crate::storage::HistoryEntry;
use crate::utils::ip::is_valid_ipv4;

pub const MSG_INVALID_IP: &str = "Please enter a valid IP address (e.g., 8.8.8.8)";
pub const MSG_LOGIN_FAILED: &str = "Login failed";
pub const MSG_LOOKUP_FAILED: &str = "Failed to fetch geolocation";
pub const MSG_HISTORY_FAILED: &str = "Failed to fetch history";
pub const MSG_DELETE_FAILED: &str = "Failed to delete history";
pub const MSG_SESSION_EXPIRED: &str = "Session expired, please log in again";

/// 已登录时的页面活动状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Loading,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    LoggedOut,
    LoggingIn,
    LoggedIn(Activity),
}

pub struct ClientApp<A: GeoTrackerApi> {
    api: A,
    store: SessionStore,
    state: ClientState,
    session: Option<Session>,
    login_error: Option<String>,
    geo: Option<GeoResult>,
    user_ip: Option<String>,
    history: Vec<HistoryEntry>,
    history_error: Option<String>,
    selected: BTreeSet<i64>,
}

impl<A: GeoTrackerApi> ClientApp<A> {
    pub fn new(api: A, store: SessionStore) -> Self {
        Self {
            api,
            store,
            state: ClientState::LoggedOut,
            session: None,
            login_error: None,
            geo: None,
            user_ip: None,
            history: Vec::new(),
            history_error: None,
            selected: BTreeSet::new(),
        }
    }

    // ============ 只读访问 ============

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, ClientState::LoggedIn(_))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    /// 当前查询区域的错误提示
    pub fn lookup_error(&self) -> Option<&str> {
        match &self.state {
            ClientState::LoggedIn(Activity::Error(msg)) => Some(msg),
            _ => None,
        }
    }

    pub fn geo(&self) -> Option<&GeoResult> {
        self.geo.as_ref()
    }

    /// 自动检测得到的本机地址
    pub fn user_ip(&self) -> Option<&str> {
        self.user_ip.as_deref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn history_error(&self) -> Option<&str> {
        self.history_error.as_deref()
    }

    pub fn selected(&self) -> &BTreeSet<i64> {
        &self.selected
    }

    // ============ 会话 ============

    /// 启动时恢复会话：无令牌保持未登录；令牌被服务端拒绝则清除
    pub fn restore_session(&mut self) -> Result<(), ClientError> {
        let Some(session) = self.store.load()? else {
            self.state = ClientState::LoggedOut;
            return Ok(());
        };

        match self.api.user_info(&session.token) {
            Ok(_) => {
                debug!("Restored session for {}", session.user.email);
                self.session = Some(session);
                self.state = ClientState::LoggedIn(Activity::Idle);
            }
            Err(e) if e.is_unauthorized() => {
                self.session = Some(session);
                self.expire_session();
            }
            Err(e) => {
                // 服务端暂时不可达时保留令牌
                warn!("Could not verify stored session: {}", e);
                self.session = Some(session);
                self.state = ClientState::LoggedIn(Activity::Error(
                    e.user_message("Could not verify session"),
                ));
            }
        }
        Ok(())
    }

    pub fn submit_login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        if self.is_logged_in() {
            return Ok(());
        }

        self.state = ClientState::LoggingIn;
        self.login_error = None;

        match self.api.login(email, password) {
            Ok(resp) => {
                let session = Session {
                    token: resp.token,
                    user: resp.user,
                };
                self.store.save(&session)?;
                self.session = Some(session);
                self.state = ClientState::LoggedIn(Activity::Idle);
                Ok(())
            }
            Err(e) => {
                self.login_error = Some(e.user_message(MSG_LOGIN_FAILED));
                self.state = ClientState::LoggedOut;
                Ok(())
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.reset_view();
        self.session = None;
        self.login_error = None;
        self.state = ClientState::LoggedOut;
        self.store.clear()
    }

    fn expire_session(&mut self) {
        self.reset_view();
        self.session = None;
        self.login_error = Some(MSG_SESSION_EXPIRED.to_string());
        self.state = ClientState::LoggedOut;
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear session file: {}", e);
        }
    }

    fn reset_view(&mut self) {
        self.geo = None;
        self.user_ip = None;
        self.history.clear();
        self.history_error = None;
        self.selected.clear();
    }

    fn token(&self) -> Option<String> {
        match self.state {
            ClientState::LoggedIn(_) => self.session.as_ref().map(|s| s.token.clone()),
            _ => None,
        }
    }

    // ============ 查询 ============

    /// 查询指定地址；格式不合法时不发请求
    pub fn search(&mut self, input: &str) {
        if !self.is_logged_in() {
            return;
        }

        if !is_valid_ipv4(input) {
            self.state = ClientState::LoggedIn(Activity::Error(MSG_INVALID_IP.to_string()));
            return;
        }

        self.fetch(Some(input));
    }

    /// 清空搜索，重新自动检测本机地址
    pub fn clear(&mut self) {
        self.fetch(None);
    }

    /// 点击历史记录：重新查询该地址（会新增一条历史）
    pub fn open_history(&mut self, id: i64) {
        let Some(ip) = self
            .history
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.ip_address.clone())
        else {
            return;
        };

        self.fetch(Some(&ip));
    }

    fn fetch(&mut self, ip: Option<&str>) {
        let Some(token) = self.token() else {
            return;
        };

        self.state = ClientState::LoggedIn(Activity::Loading);

        match self.api.lookup(&token, ip) {
            Ok(result) => {
                if ip.is_none() {
                    self.user_ip = result.queried_ip.clone();
                }
                self.geo = Some(result);
                self.state = ClientState::LoggedIn(Activity::Idle);
                self.refresh_history();
            }
            Err(e) if e.is_unauthorized() => self.expire_session(),
            Err(e) => {
                self.state =
                    ClientState::LoggedIn(Activity::Error(e.user_message(MSG_LOOKUP_FAILED)));
            }
        }
    }

    // ============ 历史 ============

    pub fn refresh_history(&mut self) {
        let Some(token) = self.token() else {
            return;
        };

        match self.api.history(&token) {
            Ok(entries) => {
                // 选择集只保留仍然存在的记录
                let ids: BTreeSet<i64> = entries.iter().map(|e| e.id).collect();
                self.selected.retain(|id| ids.contains(id));
                self.history = entries;
                self.history_error = None;
            }
            Err(e) if e.is_unauthorized() => self.expire_session(),
            Err(e) => {
                self.history_error = Some(e.user_message(MSG_HISTORY_FAILED));
            }
        }
    }

    pub fn toggle_selection(&mut self, id: i64) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// 删除选中的记录；没有选中时什么也不做
    pub fn delete_selected(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        let Some(token) = self.token() else {
            return;
        };

        let ids: Vec<i64> = self.selected.iter().copied().collect();
        match self.api.delete_history(&token, &ids) {
            Ok(()) => {
                self.selected.clear();
                self.refresh_history();
            }
            Err(e) if e.is_unauthorized() => self.expire_session(),
            Err(e) => {
                self.history_error = Some(e.user_message(MSG_DELETE_FAILED));
            }
        }
    }
}
