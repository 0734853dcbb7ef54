//! v1 (`HmacSHA1` / `HmacSHA256`) signing against the live gateway.

#[cfg(test)]
mod tests {
    use http::Method;
    use tcloud_auth::Value;
    use tcloud_core::Credential;
    use tcloud_http::{ApiRequest, TcloudClient};

    use crate::{error_code, response_json, tcloud_client, test_config};

    fn describe_regions(method: Method) -> ApiRequest {
        ApiRequest::builder()
            .service("cvm")
            .action("DescribeRegions")
            .version("2017-03-12")
            .method(method)
            .build()
    }

    #[tokio::test]
    #[ignore = "requires Tencent Cloud credentials"]
    async fn test_should_call_describe_regions_with_get() {
        let client = tcloud_client();

        let response = client.call_v1(describe_regions(Method::GET)).await.unwrap();
        assert!(response.status().is_success());

        let body = response_json(response).await;
        assert_eq!(error_code(&body), None, "unexpected error: {body}");
        assert!(body["RegionSet"].is_array());
    }

    #[tokio::test]
    #[ignore = "requires Tencent Cloud credentials"]
    async fn test_should_call_describe_regions_with_post() {
        let client = tcloud_client();

        let response = client.call_v1(describe_regions(Method::POST)).await.unwrap();
        let body = response_json(response).await;
        assert_eq!(error_code(&body), None, "unexpected error: {body}");
        assert!(body["RequestId"].is_string());
    }

    #[tokio::test]
    #[ignore = "requires Tencent Cloud credentials"]
    async fn test_should_sign_with_hmac_sha1() {
        let mut config = test_config();
        config.sign_method = "HmacSHA1".to_owned();
        let credential = Credential::from_env().unwrap();
        let client = TcloudClient::new(config, credential).unwrap();

        let request = ApiRequest::builder()
            .service("cvm")
            .action("DescribeZones")
            .version("2017-03-12")
            .method(Method::GET)
            .params(Value::map().with("Limit", 1_u64))
            .build();

        let body = response_json(client.call_v1(request).await.unwrap()).await;
        assert_eq!(error_code(&body), None, "unexpected error: {body}");
    }
}
