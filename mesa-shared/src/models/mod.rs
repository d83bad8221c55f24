/// Entity models
///
/// Each module carries the stored entity, its create payload (with
/// validation rules), and its typed patch for partial updates. Entities
/// are identified by an external string ID derived once at creation from
/// a freshly generated internal identifier; it never changes afterwards.
///
/// # Models
///
/// - `user`: accounts, credentials, and the persisted token pair
/// - `menu`: priced menu entries with an optional validity window
/// - `table`: physical tables with guest capacity
/// - `order`: an order, optionally placed at a table
/// - `order_item`: a quantity of one menu entry within an order
/// - `invoice`: payment state for one order

pub mod invoice;
pub mod menu;
pub mod order;
pub mod order_item;
pub mod table;
pub mod user;

use uuid::Uuid;

/// Derives the external ID from an internal identifier
///
/// The 32-character simple hex form; stable for the lifetime of the
/// entity.
pub fn external_id(id: Uuid) -> String {
    id.simple().to_string()
}
