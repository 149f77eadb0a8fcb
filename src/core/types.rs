use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Work categories a request can be filed under and a contractor can serve.
///
/// The order of variants is the order buttons are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr, EnumIter, EnumCount)]
pub enum Category {
    #[strum(serialize = "Экскаватор")]
    Excavator,
    #[strum(serialize = "Мини-экскаватор")]
    MiniExcavator,
    #[strum(serialize = "Погрузчик")]
    Loader,
    #[strum(serialize = "Мини-погрузчик")]
    MiniLoader,
    #[strum(serialize = "Самосвал")]
    DumpTruck,
    #[strum(serialize = "Манипулятор")]
    Manipulator,
    #[strum(serialize = "Автовышка")]
    AerialPlatform,
    #[strum(serialize = "Кран")]
    Crane,
    #[strum(serialize = "Бетонный насос")]
    ConcretePump,
    #[strum(serialize = "Демонтажная бригада")]
    DemolitionCrew,
    #[strum(serialize = "Кладочные работы")]
    Masonry,
    #[strum(serialize = "Отделочные работы")]
    Finishing,
    #[strum(serialize = "Сантехника")]
    Plumbing,
    #[strum(serialize = "Электрика")]
    Electrical,
    #[strum(serialize = "Кровля")]
    Roofing,
    #[strum(serialize = "Сварочные работы")]
    Welding,
}

impl Category {
    /// Position in [`Category::all`], used as the compact callback payload
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn all() -> impl Iterator<Item = Category> {
        Self::iter()
    }

    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Contractor moderation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ExecutorStatus {
    #[default]
    Pending,
    Approved,
    Blocked,
}

impl ExecutorStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExecutorStatus::Pending => "ожидает одобрения",
            ExecutorStatus::Approved => "одобрен",
            ExecutorStatus::Blocked => "заблокирован",
        }
    }
}

/// A contractor registered through the pro bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executor {
    pub user_id: i64,
    pub name: String,
    pub phone: String,
    pub categories: BTreeSet<Category>,
    pub status: ExecutorStatus,
    pub registered_at: DateTime<Utc>,
}

impl Executor {
    /// A freshly registered contractor, waiting for a dispatcher's decision
    pub fn new(user_id: i64, name: impl Into<String>, phone: impl Into<String>, categories: BTreeSet<Category>) -> Self {
        Self {
            user_id,
            name: name.into(),
            phone: phone.into(),
            categories,
            status: ExecutorStatus::Pending,
            registered_at: Utc::now(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ExecutorStatus::Approved
    }

    /// Approved and serving the given category
    pub fn serves(&self, category: Category) -> bool {
        self.is_approved() && self.categories.contains(&category)
    }

    /// Category names joined for display, `—` when empty
    pub fn categories_label(&self) -> String {
        join_categories(&self.categories)
    }
}

/// Joins category labels with `, ` in list order
pub fn join_categories(categories: &BTreeSet<Category>) -> String {
    if categories.is_empty() {
        return "—".to_string();
    }
    categories.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
}

/// Everything the customer entered in the request form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub customer_id: i64,
    pub customer_phone: String,
    pub category: Category,
    pub description: String,
    pub address: String,
    pub date: NaiveDate,
}

/// A customer's service request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: u64,
    pub customer_id: i64,
    pub customer_phone: String,
    pub category: Category,
    pub description: String,
    pub address: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Contractors who pressed "take" on the card
    pub responses: BTreeSet<i64>,
}

impl Order {
    pub fn from_draft(id: u64, draft: OrderDraft) -> Self {
        Self {
            id,
            customer_id: draft.customer_id,
            customer_phone: draft.customer_phone,
            category: draft.category,
            description: draft.description,
            address: draft.address,
            date: draft.date,
            created_at: Utc::now(),
            responses: BTreeSet::new(),
        }
    }

    /// Start date as shown to people: `DD.MM.YYYY`
    pub fn date_label(&self) -> String {
        self.date.format("%d.%m.%Y").to_string()
    }
}
