use {
    crate::{
        arguments::{Arguments, SAMPLE_ORDER_UID},
        orderbook_api::{OrderBookApi, OrderSource},
        verification::{self, Report},
    },
    anyhow::{Context, Result},
    clap::Parser,
    futures::{StreamExt, stream},
    model::{DomainDescriptor, DomainSeparator, order::OrderUid},
    std::process::ExitCode,
};

/// Exit code for configuration errors, the same clap uses for argument
/// errors.
const CONFIGURATION_ERROR: u8 = 2;

pub async fn start(args: impl Iterator<Item = String>) -> ExitCode {
    let args = Arguments::parse_from(args);
    let obs_config = observe::Config::new(
        args.log_filter.as_str(),
        args.log_stderr_threshold,
        args.use_json_logs,
    );
    observe::tracing::initialize(&obs_config);
    tracing::info!("running order verifier with validated arguments:\n{}", args);

    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            tracing::error!(?err, "order verifier failed");
            ExitCode::from(CONFIGURATION_ERROR)
        }
    }
}

async fn run(args: Arguments) -> Result<u8> {
    let domain = DomainSeparator::new(&DomainDescriptor::cow_protocol(args.network.chain_id()))
        .context("domain separator")?;
    let api = OrderBookApi::new(
        OrderBookApi::client(args.http_timeout)?,
        args.api_base_url,
        args.network,
    );
    let uids = if args.uids.is_empty() {
        vec![SAMPLE_ORDER_UID.parse().context("sample order uid")?]
    } else {
        args.uids
    };

    let reports = verify_all(
        &api,
        &uids,
        &domain,
        args.resolve_app_data,
        args.concurrency.get(),
    )
    .await;
    for report in &reports {
        report.log();
        if args.json {
            println!("{}", serde_json::to_string(report)?);
        }
    }
    Ok(verification::exit_code(&reports))
}

/// Verifies the orders with at most `concurrency` requests in flight. Reports
/// are returned in the order of `uids`.
pub async fn verify_all(
    source: &dyn OrderSource,
    uids: &[OrderUid],
    domain: &DomainSeparator,
    resolve_app_data: bool,
    concurrency: usize,
) -> Vec<Report> {
    stream::iter(uids)
        .map(|uid| {
            tracing::info!(%uid, "using order");
            verification::verify(source, *uid, domain, resolve_app_data)
        })
        .buffered(concurrency)
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{dto, orderbook_api::MockOrderSource, verification::Failure},
        alloy::primitives::Address,
        model::order::{OrderBalance, OrderData, OrderKind},
    };

    fn api_order(data: &OrderData, owner: Address, domain: &DomainSeparator) -> dto::Order {
        dto::Order {
            data: model::order::RawOrderData {
                sell_token: data.sell_token.to_string(),
                buy_token: data.buy_token.to_string(),
                receiver: Some(data.receiver.to_string()),
                sell_amount: data.sell_amount.to_string(),
                buy_amount: data.buy_amount.to_string(),
                valid_to: data.valid_to.into(),
                app_data: data.app_data.to_string(),
                fee_amount: data.fee_amount.to_string(),
                kind: data.kind.to_string(),
                partially_fillable: data.partially_fillable,
                sell_token_balance: data.sell_token_balance.to_string(),
                buy_token_balance: data.buy_token_balance.to_string(),
            },
            owner,
            uid: data.uid(domain, &owner).unwrap(),
            full_app_data: None,
        }
    }

    #[tokio::test]
    async fn reports_keep_input_order() {
        let domain = DomainSeparator::new(&DomainDescriptor::cow_protocol(100)).unwrap();
        let owner = Address::repeat_byte(0x42);
        let orders = [OrderKind::Sell, OrderKind::Buy].map(|kind| {
            api_order(
                &OrderData {
                    sell_token: Address::repeat_byte(1),
                    buy_token: Address::repeat_byte(2),
                    valid_to: 1_700_000_000,
                    kind,
                    sell_token_balance: OrderBalance::External,
                    ..Default::default()
                },
                owner,
                &domain,
            )
        });
        let unknown = OrderUid([0xee; 56]);
        let uids = [orders[1].uid, unknown, orders[0].uid];

        let mut source = MockOrderSource::new();
        source.expect_order().returning(move |uid| {
            orders
                .iter()
                .find(|order| order.uid == uid)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("order {uid} not found"))
        });

        let reports = verify_all(&source, &uids, &domain, false, 2).await;

        assert_eq!(
            reports.iter().map(|report| report.uid).collect::<Vec<_>>(),
            uids
        );
        assert!(reports[0].passed(), "{:?}", reports[0]);
        assert_eq!(
            reports[1].failures,
            vec![Failure::Fetch(format!("order {unknown} not found"))]
        );
        assert!(reports[2].passed(), "{:?}", reports[2]);
        assert_eq!(verification::exit_code(&reports), 1);
    }
}
