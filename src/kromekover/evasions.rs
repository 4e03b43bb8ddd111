//! Evasion scripts, in injection order. Each reads `window.__jwProfile`.

pub(super) const SCRIPTS: &[&str] = &[NAVIGATOR_WEBDRIVER, NAVIGATOR_IDENTITY, CHROME_RUNTIME, WEBGL_VENDOR, PERMISSIONS];

const NAVIGATOR_WEBDRIVER: &str = r"
Object.defineProperty(Navigator.prototype, 'webdriver', { get: () => undefined });
for (const key of Object.keys(window)) {
    if (/^cdc_|^\$cdc_/.test(key)) { try { delete window[key]; } catch (_) {} }
}
";

const NAVIGATOR_IDENTITY: &str = r"
(() => {
    const p = window.__jwProfile || {};
    if (p.platform) Object.defineProperty(Navigator.prototype, 'platform', { get: () => p.platform });
    if (p.languages) Object.defineProperty(Navigator.prototype, 'languages', { get: () => p.languages.slice() });
    if (p.hardwareConcurrency) Object.defineProperty(Navigator.prototype, 'hardwareConcurrency', { get: () => p.hardwareConcurrency });
    Object.defineProperty(Navigator.prototype, 'plugins', {
        get: () => [
            { name: 'Chrome PDF Plugin', filename: 'internal-pdf-viewer', description: 'Portable Document Format' },
            { name: 'Chrome PDF Viewer', filename: 'mhjfbmdgcfjbbpaeojofohoefgiehjai', description: '' },
        ],
    });
})();
";

const CHROME_RUNTIME: &str = r"
if (!window.chrome) { window.chrome = {}; }
if (!window.chrome.runtime) {
    window.chrome.runtime = {
        connect: () => ({ onMessage: { addListener: () => {}, removeListener: () => {} }, postMessage: () => {} }),
        sendMessage: () => {},
    };
}
";

const WEBGL_VENDOR: &str = r"
(() => {
    const p = window.__jwProfile || {};
    const patch = (proto) => {
        if (!proto) return;
        const original = proto.getParameter;
        proto.getParameter = new Proxy(original, {
            apply(target, ctx, args) {
                if (args[0] === 37445 && p.webglVendor) return p.webglVendor;
                if (args[0] === 37446 && p.webglRenderer) return p.webglRenderer;
                return Reflect.apply(target, ctx, args);
            },
        });
    };
    patch(window.WebGLRenderingContext && WebGLRenderingContext.prototype);
    patch(window.WebGL2RenderingContext && WebGL2RenderingContext.prototype);
})();
";

const PERMISSIONS: &str = r"
(() => {
    if (!navigator.permissions || !navigator.permissions.query) return;
    const query = navigator.permissions.query.bind(navigator.permissions);
    navigator.permissions.query = (params) =>
        params && params.name === 'notifications'
            ? Promise.resolve({ state: Notification.permission })
            : query(params);
})();
";
