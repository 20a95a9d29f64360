// ==========================================
// 商品目录导入 - 导入模块错误类型
// ==========================================
// 说明: 这里只承载“运行级”硬错误（中止整次导入、回滚事务）；
//       行级软错误见 domain::ImportRowError
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件行数超过上限: {limit}")]
    TooManyRows { limit: usize },

    // ===== 配置错误 =====
    #[error("导入参数错误: {0}")]
    ConfigError(String),

    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("商品处理失败 ({product}): {source}")]
    GroupProcessingError {
        product: String,
        #[source]
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::Repository(RepositoryError::from(err))
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
