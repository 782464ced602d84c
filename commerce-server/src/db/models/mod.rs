//! Database models and DTOs
//!
//! One file per aggregate. Each model derives `sqlx::FromRow` for the
//! repository layer and serde traits for the API layer.

pub mod attribute;
pub mod attribute_set;
pub mod category;
pub mod file;
pub mod order;
pub mod product;
pub mod product_attribute_value;
pub mod product_variant;
pub mod store;
pub mod translation;
pub mod user;

pub use attribute::{
    Attribute, AttributeCreate, AttributeUpdate, AttributeValue, AttributeValueCreate,
    AttributeValueUpdate,
};
pub use attribute_set::{
    AttributeSet, AttributeSetAssignment, AttributeSetCreate, AttributeSetDetail,
    AttributeSetUpdate, AssignmentCreate,
};
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use file::{
    DirectoryCreate, FileDirectory, FileGrant, GrantCreate, StoredFile,
};
pub use order::{
    Order, OrderCreate, OrderDetail, OrderItem, OrderItemCreate, OrderUpdate,
};
pub use product::{Product, ProductCreate, ProductSearchRequest, ProductUpdate};
pub use product_attribute_value::{
    AttributeAssignment, AttributeFilter, AttributeValueData, FacetCount, GroupedAttributeValue,
    ProductAttributeValueRow,
};
pub use product_variant::{
    GeneratedVariant, ProductVariant, VariantAxisValue, VariantCreate, VariantUpdate,
};
pub use store::{Store, StoreCreate, StoreSetting, StoreSettingUpsert, StoreUpdate};
pub use translation::{
    CacheStats, Language, LanguageCreate, Namespace, NamespaceCreate, Translation,
    TranslationEntry, TranslationKey, TranslationKeyCreate, TranslationUpsert,
};
pub use user::{Role, RoleCreate, User, UserCreate, UserUpdate};
