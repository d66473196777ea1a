// beanbridge-reflect: 运行时类元数据
//
// 两个容器共享的"类加载器"：
// - 按全限定名加载类
// - 计算类型闭包（类本身 + 所有父类 + 所有接口）
// - 注解与泛型返回类型的元数据

pub mod annotation;
pub mod class;
pub mod error;
pub mod generic;
pub mod loader;

pub use annotation::{Annotation, AnnotationKind};
pub use class::{Class, ClassInfo, ClassKind, Constructor, MethodInfo, Object, OBJECT_CLASS_NAME};
pub use error::{ClassNotFound, ReflectError};
pub use generic::GenericType;
pub use loader::{ClassLoader, ClassRegistry, ClassSubmission};

// 导出 inventory，供 submit_class! 宏使用
pub use inventory;

/// 在全局类注册表中登记一个类
///
/// ```ignore
/// beanbridge_reflect::submit_class!(
///     ClassInfo::class("com.example.HelloService").constructor(|| Arc::new(HelloService))
/// );
/// ```
#[macro_export]
macro_rules! submit_class {
    ($info:expr) => {
        $crate::inventory::submit! {
            $crate::ClassSubmission::new(|| $info)
        }
    };
}
