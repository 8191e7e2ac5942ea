use super::auth::authenticate;
use indicatif::ProgressStyle;
use nordigen_account::bank::{BankAccount, BankAccountManager};
use nordigen_account::config::Config;
use nordigen_account::error::{AppError, AppResult};
use nordigen_account::nordigen::NordigenOperations;
use tracing::{Span, info, instrument};
use tracing_indicatif::span_ext::IndicatifSpanExt;

pub async fn execute(
    requisition: Option<String>,
    refresh_token: Option<String>,
    no_fetch: bool,
) -> AppResult<()> {
    let config = Config::load()?;
    let requisition_id = requisition
        .or_else(|| config.requisition_id.clone())
        .ok_or_else(|| {
            AppError::Config(
                "No requisition given. Pass --requisition or set requisition_id in config file"
                    .to_string(),
            )
        })?;

    let client = authenticate(&config.nordigen, refresh_token).await?;
    let mut manager = BankAccountManager::new(&client, &requisition_id, false).await?;

    info!(
        institution = manager.institution_id().unwrap_or("unknown"),
        reference = manager.reference().unwrap_or(""),
        accounts = manager.accounts().len(),
        "Requisition loaded"
    );

    if !no_fetch {
        fetch_accounts(manager.accounts_mut()).await?;
    }

    for account in manager.accounts() {
        print_account(account);
    }

    Ok(())
}

#[instrument(name = "Fetching account data", skip_all)]
async fn fetch_accounts<C>(accounts: &mut [BankAccount<'_, C>]) -> AppResult<()>
where
    C: NordigenOperations + Sync,
{
    let span = Span::current();
    span.pb_set_style(
        &ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
        )
        .map_err(|e| AppError::Other(e.into()))?,
    );
    span.pb_set_message("Fetching accounts");
    span.pb_set_length(accounts.len() as u64);

    for account in accounts.iter_mut() {
        account.update().await?;
        span.pb_inc(1);
    }

    Ok(())
}

fn print_account<C>(account: &BankAccount<'_, C>)
where
    C: NordigenOperations + Sync,
{
    let Some(details) = account.details() else {
        info!(account_id = account.account_id(), "Account");
        return;
    };

    info!(
        account_id = account.account_id(),
        name = %details.name,
        status = %details.status,
        currency = %details.currency,
        "Account"
    );

    for balance in account.balances().unwrap_or_default() {
        info!(
            account_id = account.account_id(),
            balance_type = %balance.balance_type,
            amount = %balance.amount,
            currency = %balance.currency,
            "Balance"
        );
    }
}
