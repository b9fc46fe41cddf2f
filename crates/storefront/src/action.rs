//! Typed user actions parsed from command lines.

use core::str::FromStr;

use thiserror::Error;

use storefront_catalog::CategoryFilter;
use storefront_core::ProductId;

/// Something the shopper asked the storefront to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Filter(CategoryFilter),
    Add(ProductId),
    Remove(ProductId),
    Adjust { product_id: ProductId, delta: i64 },
    OpenCart,
    CloseCart,
    Checkout,
    Categories,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("type a command (or \"help\")")]
    Empty,
    #[error("unknown command {0:?}; type \"help\" for the list")]
    UnknownCommand(String),
    #[error("\"{command}\" needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("{0}")]
    InvalidArgument(String),
}

pub const HELP: &str = "\
commands:
  filter <category|All>   show one category
  categories              list categories
  add <id>                add one unit to the cart
  inc <id> | dec <id>     change a cart quantity by one
  adjust <id> <delta>     change a cart quantity by delta
  remove <id>             drop a product from the cart
  open | close | esc      show or hide the cart drawer
  checkout                buy what is in the cart
  quit";

fn product_arg(command: &'static str, arg: Option<&str>) -> Result<ProductId, ParseActionError> {
    let raw = arg.ok_or(ParseActionError::MissingArgument {
        command,
        argument: "a product id",
    })?;
    raw.parse::<ProductId>()
        .map_err(|_| ParseActionError::InvalidArgument(format!("{raw:?} is not a product id")))
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(keyword) = words.next() else {
            return Err(ParseActionError::Empty);
        };

        let action = match keyword.to_ascii_lowercase().as_str() {
            "filter" | "category" => {
                let category = words.collect::<Vec<_>>().join(" ");
                if category.is_empty() {
                    return Err(ParseActionError::MissingArgument {
                        command: "filter",
                        argument: "a category",
                    });
                }
                let filter = category
                    .parse::<CategoryFilter>()
                    .map_err(|e| ParseActionError::InvalidArgument(e.to_string()))?;
                Action::Filter(filter)
            }
            "add" => Action::Add(product_arg("add", words.next())?),
            "remove" | "rm" => Action::Remove(product_arg("remove", words.next())?),
            "inc" | "+" => Action::Adjust {
                product_id: product_arg("inc", words.next())?,
                delta: 1,
            },
            "dec" | "-" => Action::Adjust {
                product_id: product_arg("dec", words.next())?,
                delta: -1,
            },
            "adjust" => {
                let product_id = product_arg("adjust", words.next())?;
                let raw = words.next().ok_or(ParseActionError::MissingArgument {
                    command: "adjust",
                    argument: "a quantity change",
                })?;
                let delta = raw.parse::<i64>().map_err(|_| {
                    ParseActionError::InvalidArgument(format!("{raw:?} is not a whole number"))
                })?;
                Action::Adjust { product_id, delta }
            }
            "open" | "cart" => Action::OpenCart,
            "close" | "esc" | "escape" => Action::CloseCart,
            "checkout" => Action::Checkout,
            "categories" => Action::Categories,
            "help" | "?" => Action::Help,
            "quit" | "exit" | "q" => Action::Quit,
            other => return Err(ParseActionError::UnknownCommand(other.to_string())),
        };
        Ok(action)
    }
}
