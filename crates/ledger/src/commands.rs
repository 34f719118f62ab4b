//! Command structs for ledger operations.
//!
//! These types group parameters for the create operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{AccountType, CategoryType, Currency, Money};

/// When a movement happened and what it was for.
#[derive(Clone, Debug)]
pub struct EntryMeta {
    pub date: DateTime<Utc>,
    pub description: Option<String>,
}

impl EntryMeta {
    #[must_use]
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Spend `amount` from an account.
#[derive(Clone, Debug)]
pub struct NewExpenditureCmd {
    pub account_id: Uuid,
    pub category_id: Uuid,
    /// Strictly positive; the transaction stores it negated.
    pub amount: Money,
    pub currency: Currency,
    pub declared: bool,
    pub planned: bool,
    pub tag_ids: Vec<Uuid>,
    pub meta: EntryMeta,
}

impl NewExpenditureCmd {
    #[must_use]
    pub fn new(
        account_id: Uuid,
        category_id: Uuid,
        amount: Money,
        currency: Currency,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            category_id,
            amount,
            currency,
            declared: false,
            planned: false,
            tag_ids: Vec::new(),
            meta: EntryMeta::new(date),
        }
    }

    #[must_use]
    pub fn declared(mut self, declared: bool) -> Self {
        self.declared = declared;
        self
    }

    #[must_use]
    pub fn planned(mut self, planned: bool) -> Self {
        self.planned = planned;
        self
    }

    #[must_use]
    pub fn tags(mut self, tag_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }
}

/// Receive `amount` into an account.
#[derive(Clone, Debug)]
pub struct NewIngressCmd {
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub amount: Money,
    pub currency: Currency,
    pub tag_ids: Vec<Uuid>,
    pub meta: EntryMeta,
}

impl NewIngressCmd {
    #[must_use]
    pub fn new(
        account_id: Uuid,
        category_id: Uuid,
        amount: Money,
        currency: Currency,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            category_id,
            amount,
            currency,
            tag_ids: Vec::new(),
            meta: EntryMeta::new(date),
        }
    }

    #[must_use]
    pub fn tags(mut self, tag_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewAccountCmd {
    pub name: String,
    pub account_type: AccountType,
    pub currency: Currency,
    pub initial_balance: Money,
    pub owner_id: Option<Uuid>,
    pub active: bool,
}

impl NewAccountCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, account_type: AccountType, currency: Currency) -> Self {
        Self {
            name: name.into(),
            account_type,
            currency,
            initial_balance: Money::ZERO,
            owner_id: None,
            active: true,
        }
    }

    #[must_use]
    pub fn initial_balance(mut self, initial_balance: Money) -> Self {
        self.initial_balance = initial_balance;
        self
    }

    #[must_use]
    pub fn owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewMemberCmd {
    pub first_name: String,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub role: Option<String>,
}

impl NewMemberCmd {
    #[must_use]
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewCategoryCmd {
    pub name: String,
    pub category_type: CategoryType,
    pub description: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
}

impl NewCategoryCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, category_type: CategoryType) -> Self {
        Self {
            name: name.into(),
            category_type,
            description: None,
            color: None,
            background_color: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn colors(mut self, color: impl Into<String>, background_color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self.background_color = Some(background_color.into());
        self
    }
}

/// The tag type stays a string here: it is validated together with the name.
#[derive(Clone, Debug)]
pub struct NewTagCmd {
    pub name: String,
    pub tag_type: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
}

impl NewTagCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, tag_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag_type: tag_type.into(),
            description: None,
            color: None,
            background_color: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn colors(mut self, color: impl Into<String>, background_color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self.background_color = Some(background_color.into());
        self
    }
}
