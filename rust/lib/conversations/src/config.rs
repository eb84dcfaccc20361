use crate::error::ConfigError;
use crate::model::{InboxId, UserId};
use crate::state::{AssigneeType, ConversationsState, SortFilter, StatusFilter};

/// Store configuration: initial filters, paging and the signed-in agent.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Page length used for list and history requests. A shorter page
    /// marks the end of the data.
    pub page_size: usize,
    pub status: StatusFilter,
    pub assignee_type: AssigneeType,
    pub sort: SortFilter,
    /// `0` shows every inbox.
    pub inbox_id: InboxId,
    /// Agent whose conversations count as "mine".
    pub user_id: UserId,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: ConversationsState::DEFAULT_PAGE_SIZE,
            status: StatusFilter::Open,
            assignee_type: AssigneeType::Mine,
            sort: SortFilter::Latest,
            inbox_id: 0,
            user_id: 0,
        }
    }
}

impl StoreConfig {
    /// Parse configuration from command-line arguments.
    ///
    /// Supported flags:
    /// - `--page-size=N`
    /// - `--status=open|resolved|pending|snoozed|all`
    /// - `--assignee=mine|unassigned|all`
    /// - `--sort=latest|sort_on_created_at|sort_on_priority`
    /// - `--inbox=ID`
    /// - `--user-id=ID`
    ///
    /// Unrecognized arguments are skipped.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut config = StoreConfig::default();

        for arg in args {
            if let Some(val) = arg.strip_prefix("--page-size=") {
                config.page_size = number("page-size", val)?;
                if config.page_size == 0 {
                    return Err(ConfigError::ZeroPageSize);
                }
            } else if let Some(val) = arg.strip_prefix("--status=") {
                config.status = val.parse()?;
            } else if let Some(val) = arg.strip_prefix("--assignee=") {
                config.assignee_type = val.parse()?;
            } else if let Some(val) = arg.strip_prefix("--sort=") {
                config.sort = val.parse()?;
            } else if let Some(val) = arg.strip_prefix("--inbox=") {
                config.inbox_id = number("inbox", val)?;
            } else if let Some(val) = arg.strip_prefix("--user-id=") {
                config.user_id = number("user-id", val)?;
            }
        }

        Ok(config)
    }
}

fn number<T: std::str::FromStr>(flag: &'static str, val: &str) -> Result<T, ConfigError> {
    val.parse().map_err(|_| ConfigError::InvalidNumber {
        flag,
        value: val.to_string(),
    })
}
