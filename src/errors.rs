use std::fmt;

/// 错误分类，对应 HTTP 层的响应策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCredentials,
    Unauthenticated,
    InvalidAddress,
    InvalidRequest,
    Conflict,
    Internal,
}

#[derive(Debug, Clone)]
pub enum GeoTrackerError {
    InvalidCredentials(String),
    Unauthenticated(String),
    InvalidAddress(String),
    InvalidRequest(String),
    AlreadyExists(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Upstream(String),
    TokenIssue(String),
    PasswordHash(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
    Internal(String),
}

impl GeoTrackerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoTrackerError::InvalidCredentials(_) => "E001",
            GeoTrackerError::Unauthenticated(_) => "E002",
            GeoTrackerError::InvalidAddress(_) => "E003",
            GeoTrackerError::InvalidRequest(_) => "E004",
            GeoTrackerError::AlreadyExists(_) => "E005",
            GeoTrackerError::DatabaseConfig(_) => "E006",
            GeoTrackerError::DatabaseConnection(_) => "E007",
            GeoTrackerError::DatabaseOperation(_) => "E008",
            GeoTrackerError::Upstream(_) => "E009",
            GeoTrackerError::TokenIssue(_) => "E010",
            GeoTrackerError::PasswordHash(_) => "E011",
            GeoTrackerError::Config(_) => "E012",
            GeoTrackerError::FileOperation(_) => "E013",
            GeoTrackerError::Serialization(_) => "E014",
            GeoTrackerError::Internal(_) => "E015",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoTrackerError::InvalidCredentials(_) => "Invalid Credentials",
            GeoTrackerError::Unauthenticated(_) => "Unauthenticated",
            GeoTrackerError::InvalidAddress(_) => "Invalid Address",
            GeoTrackerError::InvalidRequest(_) => "Invalid Request",
            GeoTrackerError::AlreadyExists(_) => "Already Exists",
            GeoTrackerError::DatabaseConfig(_) => "Database Configuration Error",
            GeoTrackerError::DatabaseConnection(_) => "Database Connection Error",
            GeoTrackerError::DatabaseOperation(_) => "Database Operation Error",
            GeoTrackerError::Upstream(_) => "Upstream Service Error",
            GeoTrackerError::TokenIssue(_) => "Token Issue Error",
            GeoTrackerError::PasswordHash(_) => "Password Hash Error",
            GeoTrackerError::Config(_) => "Configuration Error",
            GeoTrackerError::FileOperation(_) => "File Operation Error",
            GeoTrackerError::Serialization(_) => "Serialization Error",
            GeoTrackerError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoTrackerError::InvalidCredentials(msg)
            | GeoTrackerError::Unauthenticated(msg)
            | GeoTrackerError::InvalidAddress(msg)
            | GeoTrackerError::InvalidRequest(msg)
            | GeoTrackerError::AlreadyExists(msg)
            | GeoTrackerError::DatabaseConfig(msg)
            | GeoTrackerError::DatabaseConnection(msg)
            | GeoTrackerError::DatabaseOperation(msg)
            | GeoTrackerError::Upstream(msg)
            | GeoTrackerError::TokenIssue(msg)
            | GeoTrackerError::PasswordHash(msg)
            | GeoTrackerError::Config(msg)
            | GeoTrackerError::FileOperation(msg)
            | GeoTrackerError::Serialization(msg)
            | GeoTrackerError::Internal(msg) => msg,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GeoTrackerError::InvalidCredentials(_) => ErrorKind::InvalidCredentials,
            GeoTrackerError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            GeoTrackerError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            GeoTrackerError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            GeoTrackerError::AlreadyExists(_) => ErrorKind::Conflict,
            _ => ErrorKind::Internal,
        }
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidCredentials | ErrorKind::Unauthenticated => 401,
            ErrorKind::InvalidAddress | ErrorKind::InvalidRequest => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoTrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoTrackerError {}

// 便捷的构造函数
impl GeoTrackerError {
    pub fn invalid_credentials() -> Self {
        GeoTrackerError::InvalidCredentials("Invalid credentials".to_string())
    }

    pub fn missing_token() -> Self {
        GeoTrackerError::Unauthenticated("No token provided".to_string())
    }

    pub fn invalid_token() -> Self {
        GeoTrackerError::Unauthenticated("Invalid token".to_string())
    }

    pub fn invalid_address() -> Self {
        GeoTrackerError::InvalidAddress("Invalid IP address".to_string())
    }

    pub fn invalid_request() -> Self {
        GeoTrackerError::InvalidRequest("Invalid request".to_string())
    }

    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        GeoTrackerError::AlreadyExists(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        GeoTrackerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        GeoTrackerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        GeoTrackerError::DatabaseOperation(msg.into())
    }

    pub fn upstream<T: Into<String>>(msg: T) -> Self {
        GeoTrackerError::Upstream(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeoTrackerError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeoTrackerError::FileOperation(msg.into())
    }
}

impl From<sea_orm::DbErr> for GeoTrackerError {
    fn from(err: sea_orm::DbErr) -> Self {
        GeoTrackerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for GeoTrackerError {
    fn from(err: std::io::Error) -> Self {
        GeoTrackerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GeoTrackerError {
    fn from(err: serde_json::Error) -> Self {
        GeoTrackerError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for GeoTrackerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        GeoTrackerError::TokenIssue(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for GeoTrackerError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        GeoTrackerError::PasswordHash(err.to_string())
    }
}

impl From<tokio::task::JoinError> for GeoTrackerError {
    fn from(err: tokio::task::JoinError) -> Self {
        GeoTrackerError::Internal(format!("Blocking task failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, GeoTrackerError>;
