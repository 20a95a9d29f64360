// ==========================================
// 商品目录导入 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 所有写操作接收调用方的 &Transaction，不自行开启事务
// ==========================================

pub mod error;
pub mod pivot_repo;
pub mod product_repo;
pub mod taxonomy_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use pivot_repo::PivotRepository;
pub use product_repo::{MediaRepository, ProductOnlineRepository, ProductRepository, VariantRepository};
pub use taxonomy_repo::{
    AttributeValueRepository, CatalogTable, CategoryRepository, ConcernOptionRepository,
    NamedEntityRepository, NamedTable, SlugRepository,
};
