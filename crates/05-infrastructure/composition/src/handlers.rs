//! 内置异常处理器

use component_macros::exception_handler;
use di_abstractions::{ContainerBuilder, ExceptionHandler};
use di_impl::ENVIRONMENT_TYPE;
use infrastructure_common::InfrastructureError;
use tracing::error;

/// 记录所有未处理错误
#[exception_handler(
    target = ENVIRONMENT_TYPE,
    priority = 100,
    class = "Lorn\\Web\\Handlers\\LoggingExceptionHandler"
)]
#[derive(Debug, Default)]
pub struct LoggingExceptionHandler;

impl ExceptionHandler for LoggingExceptionHandler {
    fn handle(
        &self,
        failure: &InfrastructureError,
        container: Option<&dyn ContainerBuilder>,
    ) -> Result<(), InfrastructureError> {
        error!(
            error_type = failure.type_name(),
            status = failure.status_code(),
            container = container.map(|c| c.type_name()).unwrap_or("-"),
            "未处理的错误: {}",
            failure
        );
        Ok(())
    }
}
