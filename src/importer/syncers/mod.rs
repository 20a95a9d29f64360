// ==========================================
// 商品目录导入 - 按实体同步
// ==========================================
// 图片: 只追加；标签/concern: 先删后插；上架: 先查后插；
// 变体属性: 存在即覆盖
// ==========================================

pub mod concerns;
pub mod media;
pub mod online;
pub mod tags;
pub mod variant;

pub use concerns::ProductConcernSyncer;
pub use media::ProductMediaSyncer;
pub use online::ProductOnlineEnsurer;
pub use tags::ProductTagSyncer;
pub use variant::{VariantAttributeSyncer, VariantSyncer};
