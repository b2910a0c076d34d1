//! Client state machine tests driven through an in-memory fake server

use std::cell::RefCell;
use std::rc::Rc;

use tempfile::TempDir;

use geotracker::api::jwt::SessionClaims;
use geotracker::api::types::{LoginResponse, UserInfoResponse, UserSummary};
use geotracker::client::{
    Activity, ClientApp, ClientState, GeoTrackerApi, Session, SessionStore,
};
use geotracker::client::ClientError;
use geotracker::services::GeoResult;
use geotracker::storage::HistoryEntry;

const TOKEN: &str = "valid-token";
const CALLER_IP: &str = "198.51.100.4";

#[derive(Default)]
struct FakeServer {
    history: Vec<HistoryEntry>,
    next_id: i64,
    lookups: Vec<Option<String>>,
    revoked: bool,
    offline: bool,
    fail_history: bool,
}

#[derive(Clone, Default)]
struct FakeApi(Rc<RefCell<FakeServer>>);

fn unauthorized() -> ClientError {
    ClientError::Http {
        status: 401,
        message: "Invalid token".to_string(),
    }
}

impl FakeApi {
    fn check(&self, token: &str) -> Result<(), ClientError> {
        let server = self.0.borrow();
        if server.offline {
            return Err(ClientError::Transport("connection refused".to_string()));
        }
        if server.revoked || token != TOKEN {
            return Err(unauthorized());
        }
        Ok(())
    }
}

impl GeoTrackerApi for FakeApi {
    fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        if email == "test@example.com" && password == "password123" {
            Ok(LoginResponse {
                token: TOKEN.to_string(),
                user: UserSummary {
                    id: 1,
                    email: email.to_string(),
                },
            })
        } else {
            Err(ClientError::Http {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        }
    }

    fn user_info(&self, token: &str) -> Result<UserInfoResponse, ClientError> {
        self.check(token)?;
        Ok(UserInfoResponse {
            user: SessionClaims {
                user_id: 1,
                email: "test@example.com".to_string(),
                iat: 0,
                exp: i64::MAX,
            },
        })
    }

    fn lookup(&self, token: &str, ip: Option<&str>) -> Result<GeoResult, ClientError> {
        self.check(token)?;
        let mut server = self.0.borrow_mut();
        server.lookups.push(ip.map(String::from));

        let queried = ip.unwrap_or(CALLER_IP).to_string();
        if let Some(ip) = ip {
            server.next_id += 1;
            let id = server.next_id;
            server.history.insert(
                0,
                HistoryEntry {
                    id,
                    user_id: 1,
                    ip_address: ip.to_string(),
                    country: Some("Japan".to_string()),
                    city: Some("Tokyo".to_string()),
                    isp: None,
                    searched_at: chrono::Utc::now(),
                },
            );
        }

        Ok(GeoResult {
            status: "success".to_string(),
            country: Some("Japan".to_string()),
            city: Some("Tokyo".to_string()),
            queried_ip: Some(queried),
            ..Default::default()
        })
    }

    fn history(&self, token: &str) -> Result<Vec<HistoryEntry>, ClientError> {
        self.check(token)?;
        let server = self.0.borrow();
        if server.fail_history {
            return Err(ClientError::Http {
                status: 500,
                message: "Failed to fetch history".to_string(),
            });
        }
        Ok(server.history.clone())
    }

    fn delete_history(&self, token: &str, ids: &[i64]) -> Result<(), ClientError> {
        self.check(token)?;
        self.0.borrow_mut().history.retain(|e| !ids.contains(&e.id));
        Ok(())
    }
}

struct Harness {
    app: ClientApp<FakeApi>,
    api: FakeApi,
    store: SessionStore,
    _dir: TempDir,
}

fn harness() -> Harness {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("session.json");
    let api = FakeApi::default();
    Harness {
        app: ClientApp::new(api.clone(), SessionStore::new(&path)),
        api,
        store: SessionStore::new(&path),
        _dir: dir,
    }
}

fn logged_in() -> Harness {
    let mut h = harness();
    h.app
        .submit_login("test@example.com", "password123")
        .expect("session write");
    assert!(h.app.is_logged_in());
    h
}

#[test]
fn test_starts_logged_out_without_session_file() {
    let mut h = harness();
    h.app.restore_session().expect("restore");
    assert_eq!(h.app.state(), &ClientState::LoggedOut);
    assert!(h.app.login_error().is_none());
}

#[test]
fn test_login_persists_session() {
    let h = logged_in();
    assert_eq!(h.app.state(), &ClientState::LoggedIn(Activity::Idle));

    let stored = h.store.load().expect("load").expect("session saved");
    assert_eq!(stored.token, TOKEN);
    assert_eq!(stored.user.email, "test@example.com");
}

#[test]
fn test_failed_login_shows_server_message() {
    let mut h = harness();
    h.app
        .submit_login("test@example.com", "nope")
        .expect("no io error");
    assert_eq!(h.app.state(), &ClientState::LoggedOut);
    assert_eq!(h.app.login_error(), Some("Invalid credentials"));
    assert_eq!(h.store.load().expect("load"), None);
}

#[test]
fn test_restore_with_valid_and_revoked_token() {
    let mut h = harness();
    h.store
        .save(&Session {
            token: TOKEN.to_string(),
            user: UserSummary {
                id: 1,
                email: "test@example.com".to_string(),
            },
        })
        .expect("save");

    h.app.restore_session().expect("restore");
    assert!(h.app.is_logged_in());

    let mut h2 = harness();
    h2.store
        .save(&Session {
            token: "stale".to_string(),
            user: UserSummary {
                id: 1,
                email: "test@example.com".to_string(),
            },
        })
        .expect("save");
    h2.app.restore_session().expect("restore");
    assert_eq!(h2.app.state(), &ClientState::LoggedOut);
    assert_eq!(h2.store.load().expect("load"), None);
    assert!(h2.app.login_error().is_some());
}

#[test]
fn test_restore_keeps_token_when_server_is_down() {
    let mut h = harness();
    h.store
        .save(&Session {
            token: TOKEN.to_string(),
            user: UserSummary {
                id: 1,
                email: "test@example.com".to_string(),
            },
        })
        .expect("save");
    h.api.0.borrow_mut().offline = true;

    h.app.restore_session().expect("restore");
    assert!(h.app.is_logged_in());
    assert!(h.app.lookup_error().is_some());
    assert!(h.store.load().expect("load").is_some());
}

#[test]
fn test_invalid_ip_is_rejected_locally() {
    let mut h = logged_in();
    h.app.search("999.1.1.1");
    assert_eq!(
        h.app.lookup_error(),
        Some("Please enter a valid IP address (e.g., 8.8.8.8)")
    );
    assert!(h.api.0.borrow().lookups.is_empty());
}

#[test]
fn test_search_refreshes_history() {
    let mut h = logged_in();
    h.app.search("8.8.8.8");

    assert_eq!(h.app.state(), &ClientState::LoggedIn(Activity::Idle));
    assert_eq!(
        h.app.geo().and_then(|g| g.queried_ip.as_deref()),
        Some("8.8.8.8")
    );
    assert_eq!(h.app.history().len(), 1);
    assert_eq!(h.app.history()[0].ip_address, "8.8.8.8");
    // 显式查询不改变自动检测到的地址
    assert_eq!(h.app.user_ip(), None);
}

#[test]
fn test_clear_detects_caller_address() {
    let mut h = logged_in();
    h.app.clear();

    assert_eq!(h.app.user_ip(), Some(CALLER_IP));
    assert_eq!(h.api.0.borrow().lookups, vec![None]);
    assert!(h.app.history().is_empty());
}

#[test]
fn test_open_history_repeats_lookup() {
    let mut h = logged_in();
    h.app.search("1.1.1.1");
    let id = h.app.history()[0].id;

    h.app.open_history(id);
    assert_eq!(h.app.history().len(), 2);
    assert_eq!(
        h.api.0.borrow().lookups,
        vec![Some("1.1.1.1".to_string()), Some("1.1.1.1".to_string())]
    );

    // 不存在的 id 什么也不做
    h.app.open_history(9999);
    assert_eq!(h.api.0.borrow().lookups.len(), 2);
}

#[test]
fn test_delete_selected() {
    let mut h = logged_in();
    h.app.search("1.1.1.1");
    h.app.search("8.8.8.8");
    let ids: Vec<i64> = h.app.history().iter().map(|e| e.id).collect();

    h.app.toggle_selection(ids[0]);
    h.app.toggle_selection(ids[1]);
    h.app.toggle_selection(ids[1]);
    assert_eq!(h.app.selected().len(), 1);

    h.app.delete_selected();
    assert!(h.app.selected().is_empty());
    assert_eq!(h.app.history().len(), 1);
    assert_eq!(h.app.history()[0].id, ids[1]);
}

#[test]
fn test_history_failure_keeps_session() {
    let mut h = logged_in();
    h.api.0.borrow_mut().fail_history = true;
    h.app.refresh_history();

    assert!(h.app.is_logged_in());
    assert_eq!(h.app.history_error(), Some("Failed to fetch history"));
}

#[test]
fn test_unauthorized_response_logs_out() {
    let mut h = logged_in();
    h.app.search("1.1.1.1");
    h.api.0.borrow_mut().revoked = true;

    h.app.refresh_history();
    assert_eq!(h.app.state(), &ClientState::LoggedOut);
    assert!(h.app.history().is_empty());
    assert_eq!(h.store.load().expect("load"), None);
}

#[test]
fn test_logout_clears_everything() {
    let mut h = logged_in();
    h.app.search("1.1.1.1");
    h.app.logout().expect("logout");

    assert_eq!(h.app.state(), &ClientState::LoggedOut);
    assert!(h.app.session().is_none());
    assert!(h.app.geo().is_none());
    assert_eq!(h.store.load().expect("load"), None);
}
