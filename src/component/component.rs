//! 组件基类

/// 组件 trait
///
/// 场景对象的基础接口，名称用于日志和调试面板。
pub trait Component {
    /// 获取组件名称
    fn name(&self) -> &str;
}
