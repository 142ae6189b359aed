// 上传文件载荷
//
// 外部传输层负责接收 multipart 上传，存储层只接收原始字节和
// 调用方提供的文件名。文件名在作为路径片段使用前统一清洗。
#[derive(Debug, Clone)]
pub struct FileUpload {
    // 调用方提供的原始文件名
    pub filename: String,
    // 文件内容
    pub content: Vec<u8>,
}
