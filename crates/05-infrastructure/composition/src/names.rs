//! 服务接口与服务名称

/// 接口类型名称，作为服务提供者的目标类型
pub mod interfaces {
    pub const CONFIGURATION_BUILDER: &str =
        "Lorn\\Web\\Interfaces\\Configuration\\IConfigurationBuilder";
    pub const HTTP_REQUEST: &str = "Lorn\\Web\\Interfaces\\Http\\IHttpRequest";
    pub const HTTP_RESPONSE: &str = "Lorn\\Web\\Interfaces\\Http\\IHttpResponse";
    pub const ROUTING_COLLECTION: &str = "Lorn\\Web\\Interfaces\\Routing\\IRoutingCollection";
    pub const WEB_CONTAINER: &str = "Lorn\\Web\\Interfaces\\Container\\IWebContainer";
    pub const EXCEPTION_BUILDER: &str = "Lorn\\Web\\Interfaces\\Container\\IExceptionBuilder";

    /// 全部接口名称
    pub const ALL: [&str; 6] = [
        CONFIGURATION_BUILDER,
        HTTP_REQUEST,
        HTTP_RESPONSE,
        ROUTING_COLLECTION,
        WEB_CONTAINER,
        EXCEPTION_BUILDER,
    ];
}

/// 服务名称
pub mod services {
    pub const CONFIGURATION: &str = "configuration";
    pub const REQUEST: &str = "request";
    pub const RESPONSE: &str = "response";
    /// 启动配置，由启动器注册
    pub const SETTINGS: &str = "settings";
    /// 原始请求，由启动器注册
    pub const RAW_REQUEST: &str = "raw_request";
}
