/// Bean 的作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// 单例模式 - 容器缓存唯一的共享实例
    #[default]
    Singleton,

    /// 原型模式 - 每次请求都创建新实例，由调用方负责销毁
    Prototype,
}

impl Scope {
    pub fn is_prototype(self) -> bool {
        self == Scope::Prototype
    }
}
