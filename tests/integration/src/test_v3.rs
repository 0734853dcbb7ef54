//! v3 (`TC3-HMAC-SHA256`) signing against the live gateway.

#[cfg(test)]
mod tests {
    use http::Method;
    use tcloud_auth::Value;
    use tcloud_http::ApiRequest;

    use crate::{bad_key_client, error_code, response_json, tcloud_client};

    #[tokio::test]
    #[ignore = "requires Tencent Cloud credentials"]
    async fn test_should_call_describe_instances_with_json_body() {
        let client = tcloud_client();
        let request = ApiRequest::builder()
            .service("cvm")
            .action("DescribeInstances")
            .version("2017-03-12")
            .params(Value::map().with("Limit", 1_u64).with("Offset", 0_u64))
            .build();

        let response = client.call_v3(request).await.unwrap();
        assert!(response.status().is_success());

        let body = response_json(response).await;
        assert_eq!(error_code(&body), None, "unexpected error: {body}");
        assert!(body["TotalCount"].is_number());
    }

    #[tokio::test]
    #[ignore = "requires Tencent Cloud credentials"]
    async fn test_should_call_with_nested_query_on_get() {
        let client = tcloud_client();
        let filter = Value::map()
            .with("Name", "zone")
            .with("Values", Value::List(vec!["ap-guangzhou-3".into()]));
        let request = ApiRequest::builder()
            .service("cvm")
            .action("DescribeInstances")
            .version("2017-03-12")
            .method(Method::GET)
            .params(
                Value::map()
                    .with("Limit", 1_u64)
                    .with("Filters", Value::List(vec![filter])),
            )
            .build();

        let body = response_json(client.call_v3(request).await.unwrap()).await;
        assert_eq!(error_code(&body), None, "unexpected error: {body}");
    }

    #[tokio::test]
    #[ignore = "requires Tencent Cloud credentials"]
    async fn test_should_reject_wrong_secret_key() {
        let client = bad_key_client();
        let request = ApiRequest::builder()
            .service("cvm")
            .action("DescribeRegions")
            .version("2017-03-12")
            .build();

        let body = response_json(client.call_v3(request).await.unwrap()).await;
        let code = error_code(&body).unwrap_or_default();
        assert!(code.starts_with("AuthFailure"), "unexpected response: {body}");
    }
}
