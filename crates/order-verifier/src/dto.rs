//! Response shapes of the orderbook API.

use {
    alloy::primitives::Address,
    model::order::{OrderUid, RawOrderData},
    serde::Deserialize,
};

/// An order as returned by `GET /api/v1/orders/{uid}`. Fields the verifier
/// has no use for (status, creation date, ...) are ignored.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(flatten)]
    pub data: RawOrderData,
    pub owner: Address,
    pub uid: OrderUid,
    /// The app data document, if the orderbook knows it.
    #[serde(default)]
    pub full_app_data: Option<String>,
}

/// Response of `GET /api/v1/app_data/{hash}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub full_app_data: String,
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::verification,
        alloy::primitives::address,
        app_data::AppDataVerification,
        model::{DomainDescriptor, DomainSeparator, order::OrderData},
        serde_json::json,
    };

    /// A mainnet order in the shape the orderbook API returns it. The values
    /// are made up but consistent: `appData` is the keccak-256 of
    /// `fullAppData` and `uid` is the UID of the order data.
    fn order_response() -> serde_json::Value {
        json!({
            "creationDate": "2024-11-20T10:21:31.541424Z",
            "owner": "0x8352b830b2d719aa370cb04a1830c14cf32e3f1a",
            "uid": "0x5a29cf7b82954e5e8969a01c8497b6df7f2d0b3eef185dd78f853be584dd56808352b830b2d719aa370cb04a1830c14cf32e3f1a67655feb",
            "availableBalance": null,
            "executedBuyAmount": "0",
            "executedSellAmount": "0",
            "executedSellAmountBeforeFees": "0",
            "executedFeeAmount": "0",
            "invalidated": false,
            "status": "fulfilled",
            "class": "limit",
            "settlementContract": "0x9008d19f58aabd9ed0d60971565aa8510560ab41",
            "isLiquidityOrder": false,
            "fullAppData": "{\"appCode\":\"CoW Swap\",\"metadata\":{},\"version\":\"1.1.0\"}",
            "sellToken": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            "buyToken": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "receiver": "0x8352b830b2d719aa370cb04a1830c14cf32e3f1a",
            "sellAmount": "2000000000",
            "buyAmount": "620000000000000000",
            "validTo": 1734696939u64,
            "appData": "0x1c7300c1b67175f639eeeb936e7fa4a39db979af1c83c170eac76286a050037e",
            "feeAmount": "0",
            "kind": "sell",
            "partiallyFillable": false,
            "sellTokenBalance": "erc20",
            "buyTokenBalance": "erc20",
            "signingScheme": "eip712",
            "signature": "0x00",
            "interactions": { "pre": [], "post": [] },
        })
    }

    #[test]
    fn deserializes_order_response() {
        let order: Order = serde_json::from_value(order_response()).unwrap();

        assert_eq!(
            order.owner,
            address!("8352b830b2d719aa370cb04a1830c14cf32e3f1a")
        );
        assert_eq!(order.uid.parts().1, order.owner);
        assert_eq!(order.uid.parts().2, 0x67655feb);
        assert_eq!(
            order.data,
            RawOrderData {
                sell_token: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".into(),
                buy_token: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".into(),
                receiver: Some("0x8352b830b2d719aa370cb04a1830c14cf32e3f1a".into()),
                sell_amount: "2000000000".into(),
                buy_amount: "620000000000000000".into(),
                valid_to: 1734696939,
                app_data: "0x1c7300c1b67175f639eeeb936e7fa4a39db979af1c83c170eac76286a050037e"
                    .into(),
                fee_amount: "0".into(),
                kind: "sell".into(),
                partially_fillable: false,
                sell_token_balance: "erc20".into(),
                buy_token_balance: "erc20".into(),
            }
        );
        assert_eq!(
            order.full_app_data.as_deref(),
            Some(r#"{"appCode":"CoW Swap","metadata":{},"version":"1.1.0"}"#)
        );
    }

    #[test]
    fn order_response_passes_verification() {
        let order: Order = serde_json::from_value(order_response()).unwrap();
        let data = OrderData::try_from(&order.data).unwrap();
        let domain = DomainSeparator::new(&DomainDescriptor::cow_protocol(1)).unwrap();
        let report = verification::check(
            &order.uid,
            &data,
            &order.owner,
            order.full_app_data.as_deref(),
            &domain,
        );

        assert!(report.passed(), "{report:?}");
        assert_eq!(
            report.app_data.map(|report| report.verification),
            Some(AppDataVerification::Verified)
        );
        assert_eq!(report.computed_uid, Some(order.uid));
    }

    #[test]
    fn mistyped_valid_to_is_a_deserialization_error() {
        for valid_to in [json!("1734696939"), json!(1.5), json!(u64::MAX)] {
            let mut value = order_response();
            value["validTo"] = valid_to;
            assert!(serde_json::from_value::<Order>(value).is_err());
        }

        let mut value = order_response();
        value["validTo"] = json!(-1);
        let order: Order = serde_json::from_value(value).unwrap();
        assert_eq!(order.data.valid_to, -1);
    }

    #[test]
    fn missing_optional_fields() {
        let value = json!({
            "owner": "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
            "uid": format!("0x{}", "00".repeat(56)),
            "sellToken": "0x6b175474e89094c44da98b954eedeac495271d0f",
            "buyToken": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "receiver": null,
            "sellAmount": "1",
            "buyAmount": "1",
            "validTo": 0,
            "appData": format!("0x{}", "00".repeat(32)),
            "feeAmount": "0",
            "kind": "buy",
            "partiallyFillable": true,
            "sellTokenBalance": "external",
            "buyTokenBalance": "internal",
        });
        let order: Order = serde_json::from_value(value).unwrap();
        assert_eq!(order.data.receiver, None);
        assert_eq!(order.full_app_data, None);
    }

    #[test]
    fn deserializes_app_data_response() {
        let value = json!({ "fullAppData": "{}" });
        assert_eq!(
            serde_json::from_value::<AppData>(value).unwrap(),
            AppData {
                full_app_data: "{}".into()
            }
        );
    }
}
