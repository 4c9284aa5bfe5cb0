// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Write-Suppressing Filesystem
//!
//! [`NoSaveFs`] wraps any `DavFileSystem` and hands out [`NoSaveFile`]
//! handles whose writes persist zeros instead of the caller's bytes. The
//! length of every write is preserved, so file sizes and write success look
//! exactly as they would without the wrapper.
//!
//! Everything except the write path of an open file is forwarded verbatim,
//! including errors and the optional hooks (timestamps, redirects).

use axum::http::StatusCode;
use bytes::{Buf, Bytes};
use dav_server::davpath::DavPath;
use dav_server::fs::{
    DavDirEntry, DavFile, DavFileSystem, DavMetaData, DavProp, FsFuture, FsStream, OpenOptions,
    ReadDirMeta,
};
use std::future::Future;
use std::io::SeekFrom;
use std::pin::Pin;
use std::sync::Arc;
use std::time::SystemTime;

/// Filesystem decorator that never stores written content
#[derive(Clone)]
pub struct NoSaveFs {
    inner: Arc<dyn DavFileSystem>,
}

impl NoSaveFs {
    pub fn new(inner: Box<dyn DavFileSystem>) -> Box<NoSaveFs> {
        Box::new(NoSaveFs {
            inner: Arc::from(inner),
        })
    }
}

impl DavFileSystem for NoSaveFs {
    fn open<'a>(&'a self, path: &'a DavPath, options: OpenOptions) -> FsFuture<'a, Box<dyn DavFile>> {
        Box::pin(async move {
            let file = self.inner.open(path, options).await?;
            Ok(Box::new(NoSaveFile::new(file)) as Box<dyn DavFile>)
        })
    }

    fn read_dir<'a>(
        &'a self,
        path: &'a DavPath,
        meta: ReadDirMeta,
    ) -> FsFuture<'a, FsStream<Box<dyn DavDirEntry>>> {
        self.inner.read_dir(path, meta)
    }

    fn metadata<'a>(&'a self, path: &'a DavPath) -> FsFuture<'a, Box<dyn DavMetaData>> {
        self.inner.metadata(path)
    }

    fn symlink_metadata<'a>(&'a self, path: &'a DavPath) -> FsFuture<'a, Box<dyn DavMetaData>> {
        self.inner.symlink_metadata(path)
    }

    fn create_dir<'a>(&'a self, path: &'a DavPath) -> FsFuture<'a, ()> {
        self.inner.create_dir(path)
    }

    fn remove_dir<'a>(&'a self, path: &'a DavPath) -> FsFuture<'a, ()> {
        self.inner.remove_dir(path)
    }

    fn remove_file<'a>(&'a self, path: &'a DavPath) -> FsFuture<'a, ()> {
        self.inner.remove_file(path)
    }

    fn rename<'a>(&'a self, from: &'a DavPath, to: &'a DavPath) -> FsFuture<'a, ()> {
        self.inner.rename(from, to)
    }

    fn copy<'a>(&'a self, from: &'a DavPath, to: &'a DavPath) -> FsFuture<'a, ()> {
        self.inner.copy(from, to)
    }

    fn have_props<'a>(&'a self, path: &'a DavPath) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        self.inner.have_props(path)
    }

    fn patch_props<'a>(
        &'a self,
        path: &'a DavPath,
        patch: Vec<(bool, DavProp)>,
    ) -> FsFuture<'a, Vec<(StatusCode, DavProp)>> {
        self.inner.patch_props(path, patch)
    }

    fn get_props<'a>(&'a self, path: &'a DavPath, do_content: bool) -> FsFuture<'a, Vec<DavProp>> {
        self.inner.get_props(path, do_content)
    }

    fn get_prop<'a>(&'a self, path: &'a DavPath, prop: DavProp) -> FsFuture<'a, Vec<u8>> {
        self.inner.get_prop(path, prop)
    }

    fn get_quota(&self) -> FsFuture<'_, (u64, Option<u64>)> {
        self.inner.get_quota()
    }

    fn set_accessed<'a>(&'a self, path: &'a DavPath, tm: SystemTime) -> FsFuture<'a, ()> {
        self.inner.set_accessed(path, tm)
    }

    fn set_modified<'a>(&'a self, path: &'a DavPath, tm: SystemTime) -> FsFuture<'a, ()> {
        self.inner.set_modified(path, tm)
    }
}

/// Open file whose writes are replaced by same-length zeros
#[derive(Debug)]
pub struct NoSaveFile {
    inner: Box<dyn DavFile>,
}

impl NoSaveFile {
    pub fn new(inner: Box<dyn DavFile>) -> Self {
        Self { inner }
    }
}

impl DavFile for NoSaveFile {
    fn metadata(&mut self) -> FsFuture<'_, Box<dyn DavMetaData>> {
        self.inner.metadata()
    }

    fn write_buf(&mut self, buf: Box<dyn Buf + Send>) -> FsFuture<'_, ()> {
        let zeros = zeroed(buf.remaining());
        self.inner.write_buf(Box::new(zeros))
    }

    fn write_bytes(&mut self, buf: Bytes) -> FsFuture<'_, ()> {
        let zeros = zeroed(buf.len());
        self.inner.write_bytes(zeros)
    }

    fn read_bytes(&mut self, count: usize) -> FsFuture<'_, Bytes> {
        self.inner.read_bytes(count)
    }

    fn seek(&mut self, pos: SeekFrom) -> FsFuture<'_, u64> {
        self.inner.seek(pos)
    }

    fn flush(&mut self) -> FsFuture<'_, ()> {
        self.inner.flush()
    }

    fn redirect_url(&mut self) -> FsFuture<'_, Option<String>> {
        self.inner.redirect_url()
    }
}

fn zeroed(len: usize) -> Bytes {
    Bytes::from(vec![0u8; len])
}
