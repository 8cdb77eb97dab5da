//! 启动组合层集成测试

mod integration_tests;
